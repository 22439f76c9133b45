//! Submitting, listing and downloading batches.

use lote::{GeneratedCode, HistoryEntry, LoteError, LoteSession, RawSubmission};
use lote_blob::FileStore;

use super::clip;
use crate::config::TrackerConfig;

pub struct SubmitOptions {
    pub download: bool,
    pub data_url: bool,
    pub json: bool,
}

pub fn submit(
    session: &mut LoteSession,
    raw: RawSubmission,
    config: &TrackerConfig,
    opts: SubmitOptions,
) -> anyhow::Result<()> {
    match session.submit(raw) {
        Ok(_) => {}
        Err(LoteError::Validation(fields)) => {
            let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
            anyhow::bail!("please fill in all required fields: {}", names.join(", "));
        }
        Err(e) => return Err(e.into()),
    }

    let saved = if opts.download {
        save_png(session, config)?
    } else {
        None
    };
    let Some(code) = session.current() else {
        anyhow::bail!("no code on display after submit");
    };

    if opts.json {
        let mut out = serde_json::json!({
            "entry": code.entry,
            "payload": code.payload,
            "fileName": code.file_name(),
        });
        if let Some(name) = &saved {
            out["savedAs"] = serde_json::Value::String(name.clone());
        }
        if opts.data_url {
            out["dataUrl"] = serde_json::Value::String(code.qr.data_url());
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_code(code)?;
    if let Some(name) = saved {
        println!("Saved {}", config.export.dir.join(name).display());
    }
    if opts.data_url {
        println!("{}", code.qr.data_url());
    }
    Ok(())
}

pub fn history(session: &LoteSession, json: bool) -> anyhow::Result<()> {
    let entries = session.history()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No batches recorded yet.");
        return Ok(());
    }
    println!(
        "{:<15} {:<20} {:>10} {:<20} {}",
        "ID", "PRODUCT", "QUANTITY", "SUPPLIER", "DATE"
    );
    for entry in &entries {
        println!("{}", entry_row(entry));
    }
    Ok(())
}

pub fn show(session: &mut LoteSession, id: &str, json: bool) -> anyhow::Result<()> {
    let code = session.reopen(id)?;
    if json {
        let out = serde_json::json!({
            "entry": code.entry,
            "payload": code.payload,
            "fileName": code.file_name(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    print_code(code)
}

/// Write a stored batch's code to the export directory. With no id the
/// newest batch is used; an empty history writes nothing.
pub fn download(
    session: &mut LoteSession,
    id: Option<&str>,
    config: &TrackerConfig,
    json: bool,
) -> anyhow::Result<()> {
    match id {
        Some(id) => {
            session.reopen(id)?;
        }
        None => {
            session.reopen_latest()?;
        }
    }
    let Some(name) = save_png(session, config)? else {
        return Ok(());
    };
    if json {
        println!("{}", serde_json::json!({ "savedAs": name }));
    } else {
        println!("Saved {}", config.export.dir.join(&name).display());
    }
    Ok(())
}

fn save_png(session: &LoteSession, config: &TrackerConfig) -> anyhow::Result<Option<String>> {
    let sink = FileStore::open(&config.export.dir)
        .map_err(|e| anyhow::anyhow!("cannot open export dir {}: {}", config.export.dir.display(), e))?;
    Ok(session.download(&sink)?)
}

fn print_code(code: &GeneratedCode) -> anyhow::Result<()> {
    let record = &code.entry.record;
    println!("ID:        {}", code.entry.id);
    println!("Operator:  {} ({})", record.operator_name, record.operator_code);
    println!("Product:   {}", record.product_type);
    println!("Quantity:  {}", record.quantity);
    println!("Supplier:  {}", record.supplier);
    println!("Date:      {}", record.date);
    println!("QR:        {}", code.payload.to_json()?);
    println!("File:      {} ({}x{} px)", code.file_name(), code.qr.size(), code.qr.size());
    Ok(())
}

fn entry_row(entry: &HistoryEntry) -> String {
    let record = &entry.record;
    format!(
        "{:<15} {:<20} {:>10} {:<20} {}",
        entry.id,
        clip(&record.product_type, 20),
        clip(&record.quantity, 10),
        clip(&record.supplier, 20),
        record.date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lote::BatchRecord;

    #[test]
    fn row_lines_up_columns() {
        let entry = HistoryEntry {
            id: "1700000000000".to_string(),
            record: BatchRecord {
                operator_name: "Juan Pérez".to_string(),
                operator_code: "OP-001".to_string(),
                product_type: "Cúrcuma".to_string(),
                quantity: "500g".to_string(),
                supplier: "Especias SA".to_string(),
                date: "2024-01-15".to_string(),
            },
        };
        let row = entry_row(&entry);
        assert!(row.starts_with("1700000000000   Cúrcuma"));
        assert!(row.ends_with("Especias SA          2024-01-15"));
        assert!(!row.contains("OP-001"));
    }
}
