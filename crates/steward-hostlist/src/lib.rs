//! steward-hostlist — host-range expression translation.
//!
//! Purely syntactic conversions between compact host-range expressions
//! (`node[01-04,07]`), flat host lists, and the colon-separated task-list
//! dialect spoken by external schedulers. Nothing here touches cluster
//! state; the scheduler core and this crate meet only in the daemon's
//! bootstrap code.
//!
//! Two task-list dialect forms are understood:
//!
//! - format 1: `n0:n0:n1` — one host entry per task
//! - format 2: `n[0-1]*2:n2` — a host expression with a `*count`
//!   per-host task multiplier

use thiserror::Error;

/// Result type alias for hostlist operations.
pub type HostlistResult<T> = Result<T, HostlistError>;

/// Errors raised by malformed host-range or task-list expressions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostlistError {
    #[error("unbalanced bracket in hostlist expression: {0}")]
    UnbalancedBracket(String),

    #[error("empty range in hostlist expression: {0}")]
    EmptyRange(String),

    #[error("bad range bound in hostlist expression: {0}")]
    BadBound(String),

    #[error("reversed range {0}-{1} in hostlist expression")]
    ReversedRange(u64, u64),

    #[error("bad task repeat count: {0}")]
    BadRepeatCount(String),
}

/// Expand a host-range expression into individual host names.
///
/// `"n[1-3,5],head"` → `["n1", "n2", "n3", "n5", "head"]`. Zero padding
/// is preserved: `"n[01-03]"` → `["n01", "n02", "n03"]`.
pub fn expand(expr: &str) -> HostlistResult<Vec<String>> {
    let mut hosts = Vec::new();
    for term in split_terms(expr)? {
        expand_term(&term, &mut hosts)?;
    }
    Ok(hosts)
}

/// Compress host names into a compact host-range expression.
///
/// The inverse of [`expand`]: hosts sharing a prefix and padding width
/// are merged into bracketed ranges, numerically sorted and
/// deduplicated. `["n1","n2","n3","n5"]` → `"n[1-3,5]"`.
pub fn compress(hosts: &[String]) -> String {
    // Group by (prefix, padded width); names without a numeric suffix
    // pass through verbatim.
    let mut groups: Vec<(String, usize, Vec<u64>)> = Vec::new();
    let mut plain: Vec<String> = Vec::new();

    for host in hosts {
        match split_numeric_suffix(host) {
            Some((prefix, number, width)) => {
                match groups
                    .iter_mut()
                    .find(|(p, w, _)| p.as_str() == prefix && *w == width)
                {
                    Some((_, _, numbers)) => numbers.push(number),
                    None => groups.push((prefix.to_string(), width, vec![number])),
                }
            }
            None => {
                if !plain.contains(host) {
                    plain.push(host.clone());
                }
            }
        }
    }

    let mut parts: Vec<String> = Vec::new();
    for (prefix, width, mut numbers) in groups {
        numbers.sort_unstable();
        numbers.dedup();
        if numbers.len() == 1 {
            parts.push(format!("{prefix}{}", pad(numbers[0], width)));
            continue;
        }
        let mut ranges: Vec<String> = Vec::new();
        let mut start = numbers[0];
        let mut prev = numbers[0];
        for &n in &numbers[1..] {
            if n == prev + 1 {
                prev = n;
                continue;
            }
            ranges.push(range_str(start, prev, width));
            start = n;
            prev = n;
        }
        ranges.push(range_str(start, prev, width));
        parts.push(format!("{prefix}[{}]", ranges.join(",")));
    }
    parts.extend(plain);
    parts.join(",")
}

/// Expand an external-dialect task list into one host entry per task.
///
/// Accepts both dialect forms; the result length is the task count.
pub fn tasklist_to_hosts(tasklist: &str) -> HostlistResult<Vec<String>> {
    if tasklist.is_empty() {
        return Ok(Vec::new());
    }
    if !tasklist.contains('*') {
        // Format 1: plain colon-separated hosts.
        return Ok(tasklist.split(':').map(str::to_string).collect());
    }

    // Format 2: host expression with optional task multiplier.
    let mut tasks = Vec::new();
    for token in tasklist.split(':') {
        let (expr, reps) = match token.split_once('*') {
            Some((expr, count)) => {
                let reps: usize = count
                    .parse()
                    .map_err(|_| HostlistError::BadRepeatCount(count.to_string()))?;
                if reps == 0 {
                    return Err(HostlistError::BadRepeatCount(count.to_string()));
                }
                (expr, reps)
            }
            None => (token, 1),
        };
        for host in expand(expr)? {
            for _ in 0..reps {
                tasks.push(host.clone());
            }
        }
    }
    Ok(tasks)
}

/// Render per-task hosts as a format-1 task list (`n0:n0:n1`).
pub fn hosts_to_tasklist(hosts: &[String]) -> String {
    hosts.join(":")
}

/// Split a top-level comma list, keeping bracketed ranges intact.
fn split_terms(expr: &str) -> HostlistResult<Vec<String>> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in expr.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                if depth == 0 {
                    return Err(HostlistError::UnbalancedBracket(expr.to_string()));
                }
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if depth != 0 {
        return Err(HostlistError::UnbalancedBracket(expr.to_string()));
    }
    if !current.is_empty() {
        terms.push(current);
    }
    Ok(terms)
}

/// Expand one term (`prefix[ranges]` or a bare name) into `out`.
fn expand_term(term: &str, out: &mut Vec<String>) -> HostlistResult<()> {
    let Some(open) = term.find('[') else {
        if !term.is_empty() {
            out.push(term.to_string());
        }
        return Ok(());
    };
    let Some(close) = term.rfind(']') else {
        return Err(HostlistError::UnbalancedBracket(term.to_string()));
    };
    let prefix = &term[..open];
    let list = &term[open + 1..close];
    if list.is_empty() {
        return Err(HostlistError::EmptyRange(term.to_string()));
    }

    for part in list.split(',') {
        let (lo_str, hi_str) = match part.split_once('-') {
            Some((lo, hi)) => (lo, hi),
            None => (part, part),
        };
        let lo: u64 = lo_str
            .parse()
            .map_err(|_| HostlistError::BadBound(part.to_string()))?;
        let hi: u64 = hi_str
            .parse()
            .map_err(|_| HostlistError::BadBound(part.to_string()))?;
        if lo > hi {
            return Err(HostlistError::ReversedRange(lo, hi));
        }
        let width = if lo_str.starts_with('0') && lo_str.len() > 1 {
            lo_str.len()
        } else {
            0
        };
        for n in lo..=hi {
            out.push(format!("{prefix}{}", pad(n, width)));
        }
    }
    Ok(())
}

/// Split a trailing decimal suffix off a host name.
///
/// Returns `(prefix, number, padded_width)`; width is 0 for unpadded
/// numbers. `None` if the name has no numeric suffix.
fn split_numeric_suffix(host: &str) -> Option<(&str, u64, usize)> {
    let digits = host
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let split = host.len() - digits;
    let suffix = &host[split..];
    let number: u64 = suffix.parse().ok()?;
    let width = if suffix.starts_with('0') && suffix.len() > 1 {
        suffix.len()
    } else {
        0
    };
    Some((&host[..split], number, width))
}

fn pad(n: u64, width: usize) -> String {
    if width == 0 {
        n.to_string()
    } else {
        format!("{n:0width$}")
    }
}

fn range_str(start: u64, end: u64, width: usize) -> String {
    if start == end {
        pad(start, width)
    } else {
        format!("{}-{}", pad(start, width), pad(end, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expand_ranges_and_singles() {
        assert_eq!(
            expand("n[1-3,5]").unwrap(),
            strings(&["n1", "n2", "n3", "n5"])
        );
        assert_eq!(expand("head").unwrap(), strings(&["head"]));
        assert_eq!(
            expand("n[1-2],head,gpu[7]").unwrap(),
            strings(&["n1", "n2", "head", "gpu7"])
        );
    }

    #[test]
    fn expand_preserves_zero_padding() {
        assert_eq!(
            expand("n[01-03]").unwrap(),
            strings(&["n01", "n02", "n03"])
        );
        assert_eq!(expand("n[08-11]").unwrap(), strings(&["n08", "n09", "n10", "n11"]));
    }

    #[test]
    fn expand_rejects_malformed_expressions() {
        assert_eq!(
            expand("n[1-3"),
            Err(HostlistError::UnbalancedBracket("n[1-3".to_string()))
        );
        assert_eq!(
            expand("n[]"),
            Err(HostlistError::EmptyRange("n[]".to_string()))
        );
        assert_eq!(expand("n[5-2]"), Err(HostlistError::ReversedRange(5, 2)));
        assert_eq!(
            expand("n[a-b]"),
            Err(HostlistError::BadBound("a-b".to_string()))
        );
    }

    #[test]
    fn compress_merges_consecutive_runs() {
        assert_eq!(compress(&strings(&["n1", "n2", "n3", "n5"])), "n[1-3,5]");
        assert_eq!(compress(&strings(&["n4"])), "n4");
        assert_eq!(compress(&strings(&["head", "n1", "n2"])), "n[1-2],head");
    }

    #[test]
    fn compress_sorts_and_deduplicates() {
        assert_eq!(compress(&strings(&["n3", "n1", "n2", "n1"])), "n[1-3]");
    }

    #[test]
    fn compress_keeps_padding_groups_apart() {
        assert_eq!(
            compress(&strings(&["n01", "n02", "n1", "n2"])),
            "n[01-02],n[1-2]"
        );
    }

    #[test]
    fn expand_compress_round_trip() {
        // Numbered groups come back first, bare names last.
        let mut hosts = expand("gpu[01-04,09],login,n[1-3]").unwrap();
        let compressed = compress(&hosts);
        assert_eq!(compressed, "gpu[01-04,09],n[1-3],login");
        let mut reexpanded = expand(&compressed).unwrap();
        hosts.sort();
        reexpanded.sort();
        assert_eq!(reexpanded, hosts);
    }

    #[test]
    fn tasklist_format_one() {
        assert_eq!(
            tasklist_to_hosts("n0:n0:n1:n1:n2").unwrap(),
            strings(&["n0", "n0", "n1", "n1", "n2"])
        );
        assert!(tasklist_to_hosts("").unwrap().is_empty());
    }

    #[test]
    fn tasklist_format_two_repeats_hosts() {
        assert_eq!(
            tasklist_to_hosts("n[0-1]*2:n2").unwrap(),
            strings(&["n0", "n0", "n1", "n1", "n2"])
        );
    }

    #[test]
    fn tasklist_rejects_bad_repeat_counts() {
        assert_eq!(
            tasklist_to_hosts("n[0-1]*x"),
            Err(HostlistError::BadRepeatCount("x".to_string()))
        );
        assert_eq!(
            tasklist_to_hosts("n0*0"),
            Err(HostlistError::BadRepeatCount("0".to_string()))
        );
    }

    #[test]
    fn hosts_round_trip_through_tasklist() {
        let hosts = strings(&["n0", "n0", "n1"]);
        assert_eq!(hosts_to_tasklist(&hosts), "n0:n0:n1");
        assert_eq!(tasklist_to_hosts("n0:n0:n1").unwrap(), hosts);
    }
}
