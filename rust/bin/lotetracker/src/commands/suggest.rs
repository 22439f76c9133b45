use lote::{LoteSession, SuggestionField};

pub fn run(
    session: &LoteSession,
    field: SuggestionField,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    let matches = session.suggestions(field, query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }
    if matches.is_empty() {
        println!("No {} match '{}'.", field, query);
        return Ok(());
    }
    for value in matches {
        println!("{}", value);
    }
    Ok(())
}
