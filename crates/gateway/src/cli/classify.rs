use ab_domain::url_context;

/// Print the classification of `url` as pretty JSON.
pub fn run(url: &str) -> anyhow::Result<()> {
    let ctx = url_context::classify(Some(url));
    println!("{}", serde_json::to_string_pretty(&ctx)?);
    Ok(())
}
