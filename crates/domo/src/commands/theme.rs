//! Theme preference command handler.

use color_eyre::eyre::Result;

use domo_core::PreferenceStore;

use crate::cli::ThemeMode;

/// `domo theme [dark|light|system]`
///
/// Without an argument, prints the stored preference. `system` clears
/// the explicit flag so the UI follows the ambient theme again.
pub async fn run(mode: Option<ThemeMode>) -> Result<()> {
    let store = PreferenceStore::open(PreferenceStore::default_path()?)?;

    match mode {
        None => {
            let current = match store.dark_mode() {
                Some(true) => "dark",
                Some(false) => "light",
                None => "system",
            };
            println!("{current}");
        }
        Some(ThemeMode::Dark) => {
            store.set_dark_mode(true).await?;
            println!("theme set to dark");
        }
        Some(ThemeMode::Light) => {
            store.set_dark_mode(false).await?;
            println!("theme set to light");
        }
        Some(ThemeMode::System) => {
            store.clear_dark_mode().await?;
            println!("theme follows the system");
        }
    }
    Ok(())
}
