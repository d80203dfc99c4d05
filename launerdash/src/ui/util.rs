//! Small UI helpers: truncation and number formatting.

pub fn truncate_middle(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(len - right).collect();
    format!("{head}...{tail}")
}

pub fn fmt_pct(v: f64) -> String {
    format!("{v:.2}%")
}

/// Averages the backend has not computed yet render as "No data available".
pub fn fmt_avg(v: Option<f64>) -> String {
    v.map(fmt_pct).unwrap_or_else(|| "No data available".into())
}

/// mm:ss until the session expires.
pub fn fmt_remaining(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("appserver_protheus", 9), "app...eus");
        assert_eq!(truncate_middle("serviço-áé-longo", 7), "se...go");
    }

    #[test]
    fn formats_numbers() {
        assert_eq!(fmt_avg(None), "No data available");
        assert_eq!(fmt_avg(Some(12.346)), "12.35%");
        assert_eq!(fmt_remaining(90_500), "01:30");
        assert_eq!(fmt_remaining(-5), "00:00");
    }
}
