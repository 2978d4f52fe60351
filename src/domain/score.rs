use crate::models::DomainCategory;

/// Credibility weight for a category; higher means more authoritative.
pub fn credibility_score(category: DomainCategory) -> u8 {
    match category {
        DomainCategory::Government | DomainCategory::Education => 5,
        DomainCategory::NgoOrg => 4,
        DomainCategory::NewsMedia | DomainCategory::Commercial => 3,
        DomainCategory::CommunityForum | DomainCategory::SocialMedia => 2,
        DomainCategory::CommercialFossilFuel | DomainCategory::Unknown => 1,
    }
}
