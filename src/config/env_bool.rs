/// Parses the loose boolean spellings accepted in `.env` files.
pub fn parse_env_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" | "" => Ok(false),
        other => Err(format!("not a boolean: {other:?}")),
    }
}
