use anyhow::{Context, Result};

/// Open a URL in the user's default browser
///
/// # Arguments
/// * `url` - The URL to open (e.g., a LinkedIn profile URL)
///
/// # Errors
/// Returns error if the URL is empty or the browser cannot be opened
pub fn open_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        anyhow::bail!("Profile has no URL to open");
    }
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
