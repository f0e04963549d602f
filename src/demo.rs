use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::dictionary::Dictionary;
use crate::error::PersistError;

/// Log every entry, sorted by word.
pub fn print_dictionary(dict: &Dictionary) {
    info!("dictionary ({} words):", dict.len());
    for (word, definition) in dict.entries() {
        info!("  {}: {}", word, definition);
    }
}

/// Sample workload: several threads mutate, print and save the same store
/// concurrently, then the snapshot is reloaded and printed.
///
/// The remover races the adder, so whether "lisbonne" survives depends on scheduling.
pub fn run(dict: &Dictionary, path: &Path, save_delay: Duration) -> Result<(), PersistError> {
    thread::scope(|s| {
        s.spawn(|| {
            dict.add("paris", "France");
            dict.add("lisbonne", "Portugal");
            dict.add("londres", "Angleterre");
            dict.add("abidjan", "Côte d'Ivoire");
        });
        s.spawn(|| dict.remove("lisbonne"));
        s.spawn(|| print_dictionary(dict));
        s.spawn(|| {
            thread::sleep(save_delay);
            if let Err(e) = dict.save(path) {
                warn!("error saving dictionary: {}", e);
            }
        });
    });

    match dict.get("paris") {
        Some(definition) => info!("definition of paris: {}", definition),
        None => info!("paris not found in dictionary"),
    }

    dict.load(path)?;
    info!("dictionary after reload from {}:", path.display());
    print_dictionary(dict);
    Ok(())
}
