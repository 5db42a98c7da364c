//! Example: Load and display service definitions.
//!
//! Pass a directory to load `*.json` sources from it; otherwise the bundled
//! catalog is used.

use userscout_catalog::{CatalogLoader, ErrorType, ServiceRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loader = match std::env::args().nth(1) {
        Some(dir) => {
            println!("Loading service definitions from {dir}...\n");
            CatalogLoader::from_dir(dir)?
        }
        None => {
            println!("Loading bundled service definitions...\n");
            CatalogLoader::bundled()
        }
    };

    println!("Sources (merge order): {}\n", loader.source_ids().join(", "));

    let registry = ServiceRegistry::load_from(&loader)?;
    println!("Loaded {} service definitions:\n", registry.len());

    for def in registry.iter() {
        let nsfw = if def.is_nsfw() { " [nsfw]" } else { "" };
        println!("  {}{nsfw}", def.name());
        println!("    Profile URL: {}", def.url);

        match &def.error_type {
            ErrorType::StatusCode => println!("    Detection: status code"),
            ErrorType::Message => {
                println!("    Detection: body message");
                for message in &def.error_messages {
                    println!("      - {message:?}");
                }
            }
            ErrorType::Other(raw) => println!("    Detection: status range ({raw:?})"),
        }

        if !def.categories.is_empty() {
            println!("    Categories: {}", def.categories.join(", "));
        }

        println!();
    }

    let categories: Vec<String> = registry.categories(true).into_iter().collect();
    println!("Categories in use: {}", categories.join(", "));

    Ok(())
}
