use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::aggregate::{CleanSummary, FlagSummary};
use crate::models::{AuditRow, DomainCategory};

const TOP_DOMAINS_SHOWN: usize = 10;

/// Print the classification summary for the filtered rows.
pub fn render_clean(rows: &[AuditRow], summary: &CleanSummary, verbose: bool, quiet: bool) {
    if quiet {
        println!(
            "Rows: {}  Domains: {}  Social: {}  Forums: {}",
            summary.row_count,
            summary.domain_counts.len(),
            yes_no(summary.has_social),
            yes_no(summary.has_forum),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "serp-audit".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        " Rows after filtering (≤{}): {}\n",
        summary.top_n,
        summary.row_count.to_string().bold()
    );

    println!(" Top domains in filtered SERPs:\n");
    let mut table = new_table(vec!["Domain", "Count"]);
    for (domain, count) in summary.domain_counts.iter().take(TOP_DOMAINS_SHOWN) {
        table.add_row(vec![
            Cell::new(if domain.is_empty() { "(unknown)" } else { domain.as_str() }),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}\n", table);

    println!(" Counts by domain type:\n");
    let mut table = new_table(vec!["Domain type", "Count"]);
    for (category, count) in &summary.category_counts {
        table.add_row(vec![
            Cell::new(category).fg(category_color(*category)),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}\n", table);

    if verbose {
        println!(" All filtered results:\n");
        let mut table = new_table(vec!["Position", "Domain", "Type", "Score", "Title"]);
        for row in rows {
            table.add_row(vec![
                Cell::new(row.row.position).set_alignment(CellAlignment::Right),
                Cell::new(&row.domain),
                Cell::new(row.category).fg(category_color(row.category)),
                Cell::new(row.credibility_score).set_alignment(CellAlignment::Center),
                Cell::new(row.row.title.as_deref().unwrap_or("")),
            ]);
        }
        println!("{}\n", table);
    }

    if summary.has_social {
        println!(
            " {} Social media results detected in top {}; include a special note in the client summary.\n",
            "[NOTE]".yellow().bold(),
            summary.top_n
        );
    }
}

/// Print competitor/ally/taboo/scaremongering counts and any flagged rows.
pub fn render_flags(summary: &FlagSummary, flagged: &[AuditRow], verbose: bool, quiet: bool) {
    if quiet {
        println!(
            "Competitors: {}  Allies: {}  Taboo: {}  Scaremongering: {}",
            summary.competitor_hits.len().to_string().red(),
            summary.ally_hits.len().to_string().green(),
            summary.taboo_hits.len().to_string().magenta(),
            summary.scare_rows.len().to_string().yellow(),
        );
        return;
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Competitor hits : {:>4}", summary.competitor_hits.len())
    );
    println!(
        " │  {:<48} │",
        format!("Ally hits       : {:>4}", summary.ally_hits.len())
    );
    println!(
        " │  {:<48} │",
        format!("Taboo hits      : {:>4}", summary.taboo_hits.len())
    );
    println!(
        " │  {:<48} │",
        format!("Scaremongering  : {:>4}", summary.scare_rows.len())
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if flagged.is_empty() {
        println!(" {} No flagged rows.\n", "[OK]".green().bold());
        return;
    }

    if verbose {
        println!(" {} Flagged rows:\n", "[FLAG]".red().bold());
        let mut table = new_table(vec!["Keyword", "Position", "Domain", "Type", "Flags"]);
        for row in flagged {
            table.add_row(vec![
                Cell::new(row.row.keyword.as_deref().unwrap_or("")),
                Cell::new(row.row.position).set_alignment(CellAlignment::Right),
                Cell::new(&row.domain),
                Cell::new(row.category).fg(category_color(row.category)),
                Cell::new(flag_labels(row)).fg(Color::Red),
            ]);
        }
        println!("{}\n", table);
    }
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn category_color(category: DomainCategory) -> Color {
    match category {
        DomainCategory::Government | DomainCategory::Education => Color::Green,
        DomainCategory::NgoOrg => Color::Cyan,
        DomainCategory::NewsMedia => Color::Blue,
        DomainCategory::Commercial => Color::White,
        DomainCategory::CommunityForum | DomainCategory::SocialMedia => Color::Yellow,
        DomainCategory::CommercialFossilFuel => Color::Red,
        DomainCategory::Unknown => Color::DarkGrey,
    }
}

fn flag_labels(row: &AuditRow) -> String {
    let Some(flags) = &row.flags else {
        return String::new();
    };
    let mut labels = Vec::new();
    if flags.is_competitor {
        labels.push("competitor");
    }
    if flags.is_ally {
        labels.push("ally");
    }
    if flags.is_taboo {
        labels.push("taboo");
    }
    if flags.has_scare_language() {
        labels.push("scaremongering");
    }
    labels.join(", ")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
