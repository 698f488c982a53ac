//! ZenTube CLI
//!
//! Developer tooling for the ZenTube extension: replay settings profiles
//! against captured page outlines, validate profile files, and inspect the
//! schema shared with the popup.

mod profile;

use std::fs;

use clap::{Parser, Subcommand};
use ts_rs::TS;

use zt_core::engine::Engine;
use zt_core::outline::MemoryPage;
use zt_core::page::Visibility;
use zt_core::rules;
use zt_core::settings::SettingKey;

use crate::profile::{inspect_profile, load_settings, Profile};

#[derive(Parser)]
#[command(name = "zt-cli")]
#[command(about = "ZenTube settings-profile and page-outline tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a settings profile against a captured page outline
    Simulate {
        /// Page outline file
        #[arg(short, long)]
        page: String,

        /// Settings profile JSON file
        #[arg(short = 'f', long)]
        profile: String,

        /// Location href the outline was captured at
        #[arg(long, default_value = "https://www.youtube.com/")]
        href: String,

        /// List every element with its final display state
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a settings profile JSON file
    Check {
        /// Profile file to validate
        #[arg(short, long)]
        input: String,
    },

    /// Print the DOM selectors the content script targets
    Selectors,

    /// Print the TypeScript declaration of the shared storage schema
    Bindings,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            page,
            profile,
            href,
            verbose,
        } => cmd_simulate(&page, &profile, &href, verbose),
        Commands::Check { input } => cmd_check(&input),
        Commands::Selectors => cmd_selectors(),
        Commands::Bindings => cmd_bindings(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_simulate(page_path: &str, profile_path: &str, href: &str, verbose: bool) -> Result<(), String> {
    let outline = fs::read_to_string(page_path)
        .map_err(|e| format!("Failed to read '{}': {}", page_path, e))?;
    let mut page = MemoryPage::parse(&outline)
        .map_err(|e| format!("Invalid outline '{}': {}", page_path, e))?
        .with_href(href);
    let settings = load_settings(profile_path)?;

    let mut engine = Engine::new();
    engine.load_snapshot(SettingKey::ALL.iter().map(|&key| (key, settings.get(key))));
    engine.apply(&mut page);

    println!("Replayed '{}' against '{}'", profile_path, page_path);
    println!("  Elements: {}", page.elements().len());
    println!("  Hidden:   {}", page.hidden_count());
    println!(
        "  Shorts shelves:   {}",
        hidden_of(&page.display_by_tag(rules::SHORTS_SHELF_TAG))
    );
    println!(
        "  Comment sections: {}",
        hidden_of(&page.display_by_tag(rules::COMMENTS_SECTION_TAG))
    );
    let panel: Vec<Visibility> = page.display_by_id(rules::RELATED_PANEL_ID).into_iter().collect();
    println!("  Related panel:    {}", hidden_of(&panel));
    println!(
        "  Related results:  {}",
        hidden_of(&page.display_by_class(rules::RELATED_RESULTS_CLASS))
    );

    for url in page.navigations() {
        println!("  Navigated: {}", url);
    }
    for warning in page.warnings() {
        println!("  Warned:    {}", warning);
    }

    if verbose {
        println!();
        for element in page.elements() {
            let id = element.id.as_deref().map(|i| format!(" #{i}")).unwrap_or_default();
            let classes: String = element.classes.iter().map(|c| format!(" .{c}")).collect();
            let state = match element.display {
                Visibility::Hidden => "hidden",
                Visibility::Visible => "visible",
            };
            println!("  [{:<7}] {}{}{}", state, element.tag, id, classes);
        }
    }

    Ok(())
}

fn hidden_of(displays: &[Visibility]) -> String {
    let hidden = displays.iter().filter(|&&d| d == Visibility::Hidden).count();
    format!("{}/{} hidden", hidden, displays.len())
}

fn cmd_check(input: &str) -> Result<(), String> {
    let text =
        fs::read_to_string(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let report = inspect_profile(&text)?;

    println!("Profile '{}' is valid", input);
    for key in SettingKey::ALL {
        println!("  {:<16} {}", key.as_str(), report.settings.get(key));
    }

    for key in &report.non_boolean_keys {
        println!("  Warning: '{}' is not a boolean (coerced by truthiness)", key);
    }
    for key in &report.unknown_keys {
        println!("  Warning: unknown key '{}' (the content script ignores it)", key);
    }

    Ok(())
}

fn cmd_selectors() -> Result<(), String> {
    println!("DOM selectors targeted by the content script:");
    println!("  Shorts shelf tag:       {}", rules::SHORTS_SHELF_TAG);
    println!("  Comments section tag:   {}", rules::COMMENTS_SECTION_TAG);
    println!("  Related panel id:       #{}", rules::RELATED_PANEL_ID);
    println!("  Related results class:  .{}", rules::RELATED_RESULTS_CLASS);
    println!();
    println!("Subscriptions-only redirect:");
    println!("  Href marker:   {}", rules::SUBS_FEED_MARKER);
    println!("  Redirect URL:  {}", rules::SUBS_FEED_URL);

    Ok(())
}

fn cmd_bindings() -> Result<(), String> {
    println!("// Storage schema shared between the popup and the content script.");
    println!("// Regenerate with `zt-cli bindings`.");
    println!("export {}", Profile::decl());

    Ok(())
}
