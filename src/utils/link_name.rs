use reqwest::Url;

const FALLBACK_REPORT_NAME: &str = "report.csv";

/// Suggested file name for saving the report behind `url`.
///
/// Uses the last non-empty path segment, percent-decoding spaces only, and
/// falls back to `report.csv` for unparsable URLs or bare hosts.
pub fn report_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .last()
                .map(|segment| segment.replace("%20", " "))
        })
        .unwrap_or_else(|| FALLBACK_REPORT_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::report_file_name;

    #[test]
    fn uses_last_path_segment() {
        assert_eq!(
            report_file_name("https://store.example.com/out/run-7/topics.csv?sig=abc"),
            "topics.csv"
        );
        assert_eq!(
            report_file_name("https://x/reports/topic%20report.csv/"),
            "topic report.csv"
        );
    }

    #[test]
    fn falls_back_when_no_name_is_available() {
        assert_eq!(report_file_name("https://x/"), "report.csv");
        assert_eq!(report_file_name("not a url"), "report.csv");
    }
}
