const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Reduce a bare domain or an e-mail address to its normalized ASCII domain.
/// Returns the reasons the value was rejected otherwise.
pub(crate) fn extract_domain(value: &str) -> Result<String, Vec<String>> {
    let trimmed = value
        .trim()
        .trim_matches(|c| c == ',' || c == ';')
        .trim();
    if trimmed.is_empty() {
        return Err(vec!["empty value".to_string()]);
    }

    let candidate = match trimmed.rsplit_once('@') {
        Some((local, domain)) => {
            if local.is_empty() || local.contains('@') || local.contains(char::is_whitespace) {
                return Err(vec!["invalid local part".to_string()]);
            }
            domain
        }
        None => trimmed,
    };
    if candidate.contains(char::is_whitespace) {
        return Err(vec!["domain contains whitespace".to_string()]);
    }

    let lowered = candidate.trim_end_matches('.').to_lowercase();
    let ascii = match idna::domain_to_ascii(&lowered) {
        Ok(d) => d,
        Err(_) => return Err(vec!["domain punycode conversion failed".to_string()]),
    };

    let mut reasons = Vec::new();
    check_domain(&ascii, &mut reasons);
    if reasons.is_empty() {
        Ok(ascii)
    } else {
        Err(reasons)
    }
}

/// Label checks on an ASCII domain. Pushes every invalidating reason.
pub(crate) fn check_domain(domain_ascii: &str, reasons: &mut Vec<String>) {
    if domain_ascii.is_empty() {
        reasons.push("domain empty after IDNA conversion".to_string());
        return;
    }
    if domain_ascii.len() > MAX_DOMAIN_LEN {
        reasons.push(format!(
            "domain length {} > {MAX_DOMAIN_LEN}",
            domain_ascii.len()
        ));
    }

    // au moins un point
    if !domain_ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in domain_ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > MAX_LABEL_LEN {
            reasons.push(format!(
                "domain label '{}' length {} > {MAX_LABEL_LEN}",
                label,
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!(
                "domain label '{}' cannot start/end with '-'",
                label
            ));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{}' has invalid chars", label));
        }
    }
}
