//! Query shortcut expansion.

/// Marker path for the computed body hash.
pub const HASH_PATH: &str = "__hash__";

/// Get the expansion for a shortcut prefix.
fn shortcut_expansion(shortcut: &str) -> Option<&'static str> {
    match shortcut {
        "fee" => Some("body.fee"),
        "inputs" => Some("body.inputs"),
        "outputs" => Some("body.outputs"),
        "metadata" => Some("auxiliary_data"),
        "witnesses" => Some("witness_set"),
        "hash" => Some(HASH_PATH),
        "ttl" => Some("body.ttl"),
        "mint" => Some("body.mint"),
        "certs" => Some("body.certs"),
        "withdrawals" => Some("body.withdrawals"),
        "collateral" => Some("body.collateral"),
        "required_signers" => Some("body.required_signers"),
        "network_id" => Some("body.network_id"),
        "validity_start" => Some("body.validity_start_interval"),
        "script_data_hash" => Some("body.script_data_hash"),
        "collateral_return" => Some("body.collateral_return"),
        "total_collateral" => Some("body.total_collateral"),
        "reference_inputs" => Some("body.reference_inputs"),
        "votes" => Some("body.voting_procedures"),
        "proposals" => Some("body.voting_proposals"),
        "donation" => Some("body.donation"),
        "treasury" => Some("body.current_treasury_value"),
        _ => None,
    }
}

/// Whether `query` is exactly a known shortcut.
pub fn is_shortcut(query: &str) -> bool {
    shortcut_expansion(query).is_some()
}

/// Expand a query shortcut to its full path.
///
/// Handles both exact matches and prefixes:
/// - `outputs` → `body.outputs`
/// - `outputs.0.address` → `body.outputs.0.address`
/// - `outputs[0]` → `body.outputs[0]`
pub fn expand_shortcut(query: &str) -> String {
    if let Some(expanded) = shortcut_expansion(query) {
        return expanded.to_string();
    }

    if let Some(pos) = query.find(['.', '[']) {
        let (prefix, rest) = query.split_at(pos);
        if let Some(expanded_prefix) = shortcut_expansion(prefix) {
            return format!("{}{}", expanded_prefix, rest);
        }
    }

    query.to_string()
}

/// Check if a query is the special hash computed field.
pub fn is_hash_query(expanded: &str) -> bool {
    expanded == HASH_PATH
}
