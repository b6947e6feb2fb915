/// Sharing URL to CSV export URL derivation.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` becomes
/// `<host>/spreadsheets/d/<id>/export?format=csv`.
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static SPREADSHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex"));

pub fn spreadsheet_id(share_url: &str) -> Result<&str, AppError> {
    SPREADSHEET_ID_RE
        .captures(share_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            AppError::InvalidSourceUrl(format!(
                "no /spreadsheets/d/<id> segment in '{share_url}'"
            ))
        })
}

pub fn export_url(share_url: &str, host: &str) -> Result<String, AppError> {
    let id = spreadsheet_id(share_url)?;
    Ok(format!(
        "{}/spreadsheets/d/{id}/export?format=csv",
        host.trim_end_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://docs.google.com";

    #[test]
    fn derives_export_url_from_edit_link() {
        let url = export_url(
            "https://docs.google.com/spreadsheets/d/1PvOBObJktZaGqF9DdTqPUPD3yT_ygOy5u6LB-rzYuWk/edit#gid=0",
            HOST,
        )
        .expect("valid url");
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/1PvOBObJktZaGqF9DdTqPUPD3yT_ygOy5u6LB-rzYuWk/export?format=csv"
        );
    }

    #[test]
    fn id_stops_at_first_disallowed_character() {
        assert_eq!(
            spreadsheet_id("https://x/spreadsheets/d/ab_c-9.zz/edit").expect("id"),
            "ab_c-9"
        );
    }

    #[test]
    fn custom_host_is_used() {
        let url = export_url("/spreadsheets/d/xyz", "http://127.0.0.1:8080/").expect("url");
        assert_eq!(url, "http://127.0.0.1:8080/spreadsheets/d/xyz/export?format=csv");
    }

    #[test]
    fn missing_id_is_invalid() {
        for bad in [
            "",
            "https://docs.google.com/document/d/abc",
            "https://docs.google.com/spreadsheets/d/",
            "https://docs.google.com/spreadsheets/d/$$$",
        ] {
            let err = export_url(bad, HOST).expect_err("must fail");
            assert!(matches!(err, AppError::InvalidSourceUrl(_)), "{bad}");
        }
    }
}
