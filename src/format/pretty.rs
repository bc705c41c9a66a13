//! Pretty terminal output with colors and tables.

use crate::cli::Args;
use crate::decode::{lovelace_to_ada, parse_lovelace};
use crate::error::{Error, Result};
use crate::query::{FullTransaction, QueryResult, QueryValue};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use serde_json::Value as JsonValue;

/// Witness set keys and their labels.
const WITNESS_KINDS: [(&str, &str); 8] = [
    ("0", "VKey signatures"),
    ("1", "Native scripts"),
    ("2", "Bootstrap witnesses"),
    ("3", "Plutus V1 scripts"),
    ("4", "Plutus data"),
    ("5", "Redeemers"),
    ("6", "Plutus V2 scripts"),
    ("7", "Plutus V3 scripts"),
];

/// Tag wrapping Alonzo-era auxiliary data.
const AUXILIARY_DATA_TAG: u64 = 259;

/// Format a query result as pretty terminal output.
pub fn format_pretty(result: &QueryResult, args: &Args) -> Result<String> {
    if args.no_color {
        colored::control::set_override(false);
    }

    match result {
        QueryResult::FullTransaction(full) => format_full_transaction(full, args),
        QueryResult::Single(value) => format_single_value(value, args),
        QueryResult::Multiple(values) => format_multiple_values(values, args),
    }
}

fn section(title: &str) -> String {
    format!("{}\n", title.bold().cyan())
}

fn counted_section(title: &str, count: usize) -> String {
    format!("{} ({})\n", title.bold().cyan(), count)
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {} {}\n", format!("{}:", label).dimmed(), value)
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(comfy_table::Color::DarkGrey))
            .collect::<Vec<_>>(),
    );
    table
}

/// Format a full transaction.
fn format_full_transaction(full: &FullTransaction, args: &Args) -> Result<String> {
    let json = &full.json;
    let mut output = String::new();

    output.push_str(&section("Transaction"));
    output.push_str(&field(
        "Hash",
        full.hash.as_deref().unwrap_or("-").yellow(),
    ));
    let valid = match json.get("is_valid").and_then(|v| v.as_bool()) {
        Some(true) => "true".green(),
        Some(false) => "false".red(),
        None => "n/a".dimmed(),
    };
    output.push_str(&field("Valid", valid));
    output.push('\n');

    // Not a transaction array: show what was parsed
    if let Some(raw) = json.get("raw") {
        output.push_str(&section("Unrecognized payload"));
        let pretty =
            serde_json::to_string_pretty(raw).map_err(|e| Error::FormatError(e.to_string()))?;
        output.push_str(&indent(&pretty));
        return Ok(output);
    }

    match json.get("body") {
        Some(body) if body.is_object() => output.push_str(&format_body(body, args)?),
        _ => {
            output.push_str(&section("Body"));
            output.push_str(&format!("  {}\n\n", "(not a map)".dimmed()));
        }
    }

    output.push_str(&section("Witnesses"));
    output.push_str(&format_witnesses(json.get("witness_set").unwrap_or(&JsonValue::Null)));
    output.push('\n');

    output.push_str(&section("Auxiliary Data"));
    output.push_str(&format_auxiliary_data(
        json.get("auxiliary_data").unwrap_or(&JsonValue::Null),
    ));

    Ok(output)
}

fn format_body(body: &JsonValue, args: &Args) -> Result<String> {
    let mut output = section("Body");

    if let Some(fee) = body.get("fee").and_then(|v| v.as_str()) {
        output.push_str(&field("Fee", format_lovelace(fee, args)));
    }
    if let Some(ttl) = body.get("ttl").filter(|v| !v.is_null()) {
        output.push_str(&field("TTL", ttl));
    }
    if let Some(start) = body.get("validity_start_interval").filter(|v| !v.is_null()) {
        output.push_str(&field("Valid from", start));
    }
    if let Some(network) = body.get("network_id").and_then(|v| v.as_str()) {
        output.push_str(&field("Network", network));
    }
    if let Some(hash) = body.get("auxiliary_data_hash").and_then(|v| v.as_str()) {
        output.push_str(&field("Auxiliary data hash", truncate_hash(hash, 16)));
    }
    if let Some(hash) = body.get("script_data_hash").and_then(|v| v.as_str()) {
        output.push_str(&field("Script data hash", truncate_hash(hash, 16)));
    }
    if let Some(total) = body.get("total_collateral").and_then(|v| v.as_str()) {
        output.push_str(&field("Total collateral", format_lovelace(total, args)));
    }
    if let Some(donation) = body.get("donation").and_then(|v| v.as_str()) {
        output.push_str(&field("Donation", format_lovelace(donation, args)));
    }
    if let Some(treasury) = body.get("current_treasury_value").and_then(|v| v.as_str()) {
        output.push_str(&field("Treasury", format_lovelace(treasury, args)));
    }
    output.push('\n');

    if let Some(inputs) = body.get("inputs").and_then(|v| v.as_array()) {
        output.push_str(&counted_section("Inputs", inputs.len()));
        output.push_str(&format_inputs_table(inputs));
        output.push('\n');
    }

    if let Some(outputs) = body.get("outputs").and_then(|v| v.as_array()) {
        output.push_str(&counted_section("Outputs", outputs.len()));
        output.push_str(&format_outputs_table(outputs, args));
        output.push('\n');
    }

    if let Some(mint) = body.get("mint").and_then(|v| v.as_object()) {
        if !mint.is_empty() {
            output.push_str(&section("Mint"));
            output.push_str(&format_mint(mint));
            output.push('\n');
        }
    }

    for (key, title) in [("collateral", "Collateral"), ("reference_inputs", "Reference Inputs")] {
        if let Some(inputs) = body.get(key).and_then(|v| v.as_array()) {
            if !inputs.is_empty() {
                output.push_str(&counted_section(title, inputs.len()));
                output.push_str(&format_inputs_table(inputs));
                output.push('\n');
            }
        }
    }

    if let Some(collateral_return) = body.get("collateral_return").filter(|v| v.is_object()) {
        output.push_str(&section("Collateral Return"));
        output.push_str(&format_outputs_table(std::slice::from_ref(collateral_return), args));
        output.push('\n');
    }

    if let Some(signers) = body.get("required_signers").and_then(|v| v.as_array()) {
        if !signers.is_empty() {
            output.push_str(&counted_section("Required Signers", signers.len()));
            for signer in signers.iter().filter_map(|s| s.as_str()) {
                output.push_str(&format!("  {}\n", truncate_hash(signer, 16)));
            }
            output.push('\n');
        }
    }

    if let Some(certs) = body.get("certs").and_then(|v| v.as_array()) {
        if !certs.is_empty() {
            output.push_str(&counted_section("Certificates", certs.len()));
            output.push_str(&format_certificates(certs));
            output.push('\n');
        }
    }

    if let Some(withdrawals) = body.get("withdrawals").filter(|v| v.is_object()) {
        let entries = withdrawals
            .get("entries")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        output.push_str(&counted_section("Withdrawals", entries.len()));
        output.push_str(&format_withdrawals(withdrawals, entries, args));
        output.push('\n');
    }

    let governance: Vec<&str> = ["voting_procedures", "voting_proposals", "update"]
        .into_iter()
        .filter(|key| body.get(*key).is_some_and(|v| !v.is_null()))
        .collect();
    if !governance.is_empty() {
        output.push_str(&field("Also present", governance.join(", ")));
    }

    let unknown: Vec<&str> = body
        .as_object()
        .map(|map| {
            map.keys()
                .filter(|k| k.starts_with("field_"))
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default();
    if !unknown.is_empty() {
        output.push_str(&field("Unrecognized fields", unknown.join(", ").yellow()));
    }
    if !governance.is_empty() || !unknown.is_empty() {
        output.push('\n');
    }

    Ok(output)
}

/// Format inputs as a table.
fn format_inputs_table(inputs: &[JsonValue]) -> String {
    let mut table = new_table(&["#", "Transaction ID", "Index"]);

    for (idx, input) in inputs.iter().enumerate() {
        let tx_id = input
            .get("transaction_id")
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        let index = input
            .get("index")
            .and_then(|v| v.as_i64())
            .map(|i| i.to_string())
            .unwrap_or_else(|| "?".to_string());

        table.add_row(vec![
            Cell::new(idx),
            Cell::new(truncate_hash(tx_id, 16)),
            Cell::new(index),
        ]);
    }

    format!("{}\n", table)
}

/// Format outputs as a table.
fn format_outputs_table(outputs: &[JsonValue], args: &Args) -> String {
    let mut table = new_table(&["#", "Address", "Value", "Datum"]);

    for (idx, output) in outputs.iter().enumerate() {
        let address = output
            .get("address")
            .and_then(|v| v.as_str())
            .unwrap_or("?");

        let amount = output.get("amount");
        let coin = amount
            .and_then(|v| v.get("coin"))
            .and_then(|v| v.as_str())
            .map(|c| format_lovelace(c, args))
            .unwrap_or_else(|| "?".to_string());

        let policies = amount
            .and_then(|v| v.get("multiasset"))
            .and_then(|v| v.as_object())
            .map(|m| m.len())
            .unwrap_or(0);

        let value_str = if policies == 0 {
            coin
        } else {
            format!("{} + {} polic{}", coin, policies, if policies == 1 { "y" } else { "ies" })
        };

        let datum_str = match output.get("plutus_data") {
            Some(JsonValue::Null) | None => "-".dimmed().to_string(),
            Some(JsonValue::String(hash)) => format!("hash: {}", truncate_hash(hash, 8)),
            Some(_) => "inline".to_string(),
        };

        table.add_row(vec![
            Cell::new(idx),
            Cell::new(truncate_address(address, 24)),
            Cell::new(value_str),
            Cell::new(datum_str),
        ]);
    }

    format!("{}\n", table)
}

/// Format mint information: policy id → asset name → quantity.
fn format_mint(mint: &serde_json::Map<String, JsonValue>) -> String {
    let mut output = String::new();

    for (policy_id, assets) in mint {
        output.push_str(&field("Policy", truncate_hash(policy_id, 16)));

        let Some(assets) = assets.as_object() else {
            continue;
        };
        for (name, amount) in assets {
            let name_display = if name.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                hex::decode(name)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .unwrap_or_else(|| truncate_hash(name, 16))
            };

            let amount_color = match amount.as_i64() {
                Some(n) if n > 0 => format!("+{}", n).green(),
                Some(n) => n.to_string().red(),
                None => amount.to_string().normal(),
            };

            output.push_str(&format!("    {} {}\n", name_display, amount_color));
        }
    }

    output
}

/// Format certificates.
fn format_certificates(certs: &[JsonValue]) -> String {
    let mut table = new_table(&["#", "Type", "Credential", "Details"]);

    for (idx, cert) in certs.iter().enumerate() {
        let cert_type = cert
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        let credential = cert
            .get("stake_credential")
            .and_then(|c| c.get("hash"))
            .and_then(|v| v.as_str())
            .map(|h| truncate_hash(h, 16))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(idx),
            Cell::new(format_cert_type(cert_type)),
            Cell::new(credential),
            Cell::new(format_certificate_details(cert)),
        ]);
    }

    format!("{}\n", table)
}

/// Format certificate type for display (more readable).
fn format_cert_type(cert_type: &str) -> String {
    match cert_type {
        "StakeRegistration" => "Stake Registration".to_string(),
        "StakeDeregistration" => "Stake Deregistration".to_string(),
        "StakeDelegation" => "Stake Delegation".to_string(),
        "Registration" => "Registration (Conway)".to_string(),
        "Unregistration" => "Deregistration (Conway)".to_string(),
        "VoteDelegation" => "Vote Delegation".to_string(),
        "StakeVoteDelegation" => "Stake+Vote Delegation".to_string(),
        _ => cert_type.to_string(),
    }
}

/// Format certificate details based on type.
fn format_certificate_details(cert: &JsonValue) -> String {
    let mut details = Vec::new();

    let pool = cert
        .get("pool_id")
        .and_then(|v| v.as_str())
        .map(|id| truncate_address(id, 24))
        .or_else(|| {
            cert.get("pool_keyhash")
                .and_then(|v| v.as_str())
                .map(|h| truncate_hash(h, 12))
        });
    if let Some(pool) = pool {
        details.push(format!("pool: {}", pool));
    }

    if let Some(drep) = cert.get("drep") {
        details.push(format_drep_details(drep));
    }

    if let Some(deposit) = cert.get("deposit").and_then(|v| v.as_str()) {
        details.push(format!("deposit: {} lovelace", format_number_with_separators(deposit)));
    }

    if details.is_empty() {
        "-".to_string()
    } else {
        details.join(", ")
    }
}

/// Format DRep details for display.
fn format_drep_details(drep: &JsonValue) -> String {
    match drep.get("type").and_then(|v| v.as_str()).unwrap_or("?") {
        "KeyHash" => {
            let id = drep
                .get("drep_id")
                .and_then(|v| v.as_str())
                .map(|id| truncate_address(id, 24))
                .or_else(|| {
                    drep.get("hash")
                        .and_then(|v| v.as_str())
                        .map(|h| truncate_hash(h, 12))
                })
                .unwrap_or_else(|| "?".to_string());
            format!("drep: {}", id)
        }
        "AlwaysAbstain" => "drep: always abstain".to_string(),
        "AlwaysNoConfidence" => "drep: always no confidence".to_string(),
        other => format!("drep: {}", other),
    }
}

/// Format withdrawals with their total.
fn format_withdrawals(withdrawals: &JsonValue, entries: &[JsonValue], args: &Args) -> String {
    let mut table = new_table(&["#", "Reward Address", "Amount"]);

    for (idx, withdrawal) in entries.iter().enumerate() {
        let reward_addr = withdrawal
            .get("reward_address")
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        let amount = withdrawal
            .get("amount")
            .and_then(|v| v.as_str())
            .map(|a| format_lovelace(a, args))
            .unwrap_or_else(|| "?".to_string());

        table.add_row(vec![
            Cell::new(idx),
            Cell::new(truncate_address(reward_addr, 32)),
            Cell::new(amount),
        ]);
    }

    let mut output = format!("{}\n", table);
    if let Some(total) = withdrawals.get("total_amount").and_then(|v| v.as_str()) {
        output.push_str(&field("Total", format_lovelace(total, args)));
    }
    output
}

/// Number of entries in a witness slot: arrays and maps count their items.
fn entry_count(value: &JsonValue) -> Option<usize> {
    match value {
        JsonValue::Array(items) => Some(items.len()),
        JsonValue::Object(map) => Some(map.len()),
        JsonValue::Null => None,
        _ => Some(1),
    }
}

/// Format witness set summary.
fn format_witnesses(witnesses: &JsonValue) -> String {
    let mut output = String::new();

    for (key, label) in WITNESS_KINDS {
        if let Some(count) = witnesses.get(key).and_then(entry_count) {
            output.push_str(&field(label, count));
        }
    }

    if output.is_empty() {
        output.push_str(&format!("  {}\n", "(empty)".dimmed()));
    }

    output
}

/// Format auxiliary data: metadata labels and script counts.
fn format_auxiliary_data(aux: &JsonValue) -> String {
    let mut output = String::new();

    // Shelley: {label: metadatum}; Alonzo+: 259({0: metadata, ...}); Mary: [metadata, scripts]
    let metadata = match aux {
        JsonValue::Object(map) if map.get("tag").and_then(|t| t.as_u64()) == Some(AUXILIARY_DATA_TAG) => {
            map.get("value").and_then(|v| v.get("0"))
        }
        JsonValue::Object(_) => Some(aux),
        JsonValue::Array(items) => items.first(),
        _ => None,
    };

    if let Some(labels) = metadata.and_then(|m| m.as_object()) {
        output.push_str(&field("Metadata", format!("{} label(s)", labels.len())));
        for label in labels.keys().take(5) {
            output.push_str(&format!("    Label {}\n", label.yellow()));
        }
        if labels.len() > 5 {
            output.push_str(&format!(
                "    {}\n",
                format!("... and {} more", labels.len() - 5).dimmed()
            ));
        }
    }

    if output.is_empty() {
        let text = if aux.is_null() { "(none)" } else { "(present)" };
        output.push_str(&format!("  {}\n", text.dimmed()));
    }

    output
}

/// Format a single query value.
fn format_single_value(value: &QueryValue, args: &Args) -> Result<String> {
    match value {
        QueryValue::Null => Ok("null".dimmed().to_string()),
        QueryValue::Bool(b) => Ok(if *b {
            "true".green().to_string()
        } else {
            "false".red().to_string()
        }),
        QueryValue::Number(n) => Ok(n.to_string()),
        QueryValue::String(s) => {
            if s.starts_with("addr") || s.starts_with("stake") {
                Ok(s.clone())
            } else if args.ada && parse_lovelace(s).is_some() {
                Ok(format_lovelace(s, args))
            } else if s.len() > 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok(truncate_hash(s, 24))
            } else {
                Ok(s.clone())
            }
        }
        QueryValue::Array(arr) => {
            let items: Result<Vec<String>> =
                arr.iter().map(|v| format_single_value(v, args)).collect();
            Ok(format!("[{}]", items?.join(", ")))
        }
        QueryValue::Object(_) => {
            serde_json::to_string_pretty(value).map_err(|e| Error::FormatError(e.to_string()))
        }
    }
}

/// Format multiple query values (from wildcard).
fn format_multiple_values(values: &[QueryValue], args: &Args) -> Result<String> {
    let formatted: Result<Vec<String>> = values
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            let formatted = format_single_value(v, args)?;
            Ok(format!("[{}] {}", idx.to_string().dimmed(), formatted))
        })
        .collect();

    Ok(formatted?.join("\n"))
}

/// Format a decimal lovelace amount, optionally as ADA. Non-numeric amounts
/// are shown as they are.
fn format_lovelace(lovelace: &str, args: &Args) -> String {
    match parse_lovelace(lovelace) {
        Some(amount) if args.ada => format!("{} ADA", lovelace_to_ada(&amount)),
        Some(_) => format!("{} lovelace", format_number_with_separators(lovelace)),
        None => lovelace.to_string(),
    }
}

/// Format a decimal string with thousand separators.
fn format_number_with_separators(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}\n", line)).collect()
}

/// Truncate a hash for display.
fn truncate_hash(hash: &str, max_len: usize) -> String {
    if hash.len() <= max_len || !hash.is_ascii() {
        hash.to_string()
    } else {
        let half = (max_len - 3) / 2;
        format!("{}...{}", &hash[..half], &hash[hash.len() - half..])
    }
}

/// Truncate a bech32 string for display, keeping its prefix.
fn truncate_address(addr: &str, max_len: usize) -> String {
    if addr.len() <= max_len || !addr.is_ascii() {
        return addr.to_string();
    }

    let prefix_end = addr.find('1').map(|i| i + 1).unwrap_or(5);
    let suffix_len = 8;
    let prefix_len = (max_len - suffix_len - 3).max(prefix_end).min(addr.len() - suffix_len);

    format!("{}...{}", &addr[..prefix_len], &addr[addr.len() - suffix_len..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::query::execute_query;

    fn args(ada: bool) -> Args {
        Args {
            command: None,
            first: None,
            second: None,
            json: false,
            raw: false,
            ada,
            check: false,
            no_color: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_format_number_with_separators() {
        assert_eq!(format_number_with_separators("1000"), "1,000");
        assert_eq!(format_number_with_separators("1000000"), "1,000,000");
        assert_eq!(format_number_with_separators("123"), "123");
        assert_eq!(format_number_with_separators("171993"), "171,993");
    }

    #[test]
    fn test_truncate_hash() {
        let hash = "0123456789abcdef0123456789abcdef";
        assert_eq!(truncate_hash(hash, 16), "012345...abcdef");
    }

    #[test]
    fn test_truncate_address() {
        let addr = "addr1qxck47d8fy6vk2jqsf3r9k2l7vr5h9d8wkz3r9k2l7vr5h9d8wkz";
        let truncated = truncate_address(addr, 24);
        assert!(truncated.len() <= 27);
        assert!(truncated.starts_with("addr1"));
    }

    #[test]
    fn test_format_lovelace_as_ada() {
        assert_eq!(format_lovelace("2500000", &args(true)), "2.5 ADA");
        assert_eq!(format_lovelace("171993", &args(true)), "0.171993 ADA");
    }

    #[test]
    fn test_format_lovelace_as_lovelace() {
        assert_eq!(format_lovelace("2500000", &args(false)), "2,500,000 lovelace");
        assert_eq!(format_lovelace("n/a", &args(false)), "n/a");
    }

    #[test]
    fn test_full_transaction_sections() {
        let payload = format!(
            "84a3008182582000{}00018182581d61{}1a004c4b40021a00029fd9a0f5f6",
            "00".repeat(31),
            "00".repeat(28)
        );
        let result = execute_query(&decode(&payload), &payload, "").unwrap();
        let output = format_pretty(&result, &args(false)).unwrap();

        assert!(output.contains("Transaction"));
        assert!(output.contains("171,993 lovelace"));
        assert!(output.contains("Inputs (1)"));
        assert!(output.contains("Outputs (1)"));
        assert!(output.contains("5,000,000 lovelace"));
        assert!(output.contains("(empty)"));
    }

    #[test]
    fn test_pass_through_payload() {
        let result = execute_query(&decode("80"), "80", "").unwrap();
        let output = format_pretty(&result, &args(false)).unwrap();
        assert!(output.contains("Unrecognized payload"));
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_witness_counts() {
        colored::control::set_override(false);
        let witnesses = serde_json::json!({ "0": [["aa", "bb"], ["cc", "dd"]], "5": {"0": 1} });
        let output = format_witnesses(&witnesses);
        assert!(output.contains("VKey signatures: 2"));
        assert!(output.contains("Redeemers: 1"));
    }

    #[test]
    fn test_certificate_details() {
        let cert = serde_json::json!({
            "type": "VoteDelegation",
            "stake_credential": { "type": "KeyHash", "hash": "ab" },
            "drep": { "type": "AlwaysAbstain" }
        });
        assert_eq!(format_certificate_details(&cert), "drep: always abstain");
        assert_eq!(format_cert_type("VoteDelegation"), "Vote Delegation");
    }
}
