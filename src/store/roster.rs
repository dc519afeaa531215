use crate::scoring::Roster;

const CODE_COLUMNS: [&str; 3] = ["ogrenci_kodu", "ogrenciKod", "kod"];
const NAME_COLUMNS: [&str; 2] = ["ogrenci_adi", "isim"];

/// Split one delimited line, honouring double-quoted fields (`""` escapes a quote).
fn parse_record(line: &str, delimiter: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                buf.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            out.push(std::mem::take(&mut buf));
        } else {
            buf.push(ch);
        }
    }
    out.push(buf);
    out
}

/// Parse the student roster.
///
/// The first line is a header; the file is tab-delimited when the header
/// contains a tab and comma-delimited otherwise. For each row the code is the
/// first non-empty of `ogrenci_kodu`, `ogrenciKod`, `kod`, and the name the
/// first non-empty of `ogrenci_adi`, `isim`. Rows without a code are skipped.
pub fn parse_roster(text: &str) -> Roster {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines();

    let header = match lines.next() {
        Some(header) => header,
        None => return Roster::new(),
    };
    let delimiter = if header.contains('\t') { '\t' } else { ',' };
    let columns: Vec<String> = parse_record(header, delimiter)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    let find = |names: &[&str]| -> Vec<usize> {
        names
            .iter()
            .filter_map(|name| columns.iter().position(|c| c == name))
            .collect()
    };
    let code_idx = find(&CODE_COLUMNS);
    let name_idx = find(&NAME_COLUMNS);

    let first_value = |fields: &[String], idx: &[usize]| -> String {
        idx.iter()
            .filter_map(|&i| fields.get(i))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .unwrap_or("")
            .to_string()
    };

    lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = parse_record(line, delimiter);
            let code = first_value(&fields, &code_idx);
            if code.is_empty() {
                return None;
            }
            Some((code, first_value(&fields, &name_idx)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_delimited() {
        let roster = parse_roster("ogrenci_kodu,ogrenci_adi\n1001,Ayşe Yılmaz\n1002, Mehmet Demir \n");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.display_name("1001"), "Ayşe Yılmaz");
        assert_eq!(roster.display_name("1002"), "Mehmet Demir");
    }

    #[test]
    fn test_tab_delimited() {
        let roster = parse_roster("ogrenci_kodu\togrenci_adi\n1001\tDoe, Jane\n");
        assert_eq!(roster.display_name("1001"), "Doe, Jane");
    }

    #[test]
    fn test_alternate_column_names() {
        let roster = parse_roster("sinif,kod,isim\n8A,2001,Zeynep\n");
        assert!(roster.contains("2001"));
        assert_eq!(roster.display_name("2001"), "Zeynep");
    }

    #[test]
    fn test_empty_primary_column_falls_back() {
        let roster = parse_roster("ogrenci_kodu,kod,ogrenci_adi\n,3001,Ali\n");
        assert!(roster.contains("3001"));
    }

    #[test]
    fn test_rows_without_code_skipped() {
        let roster = parse_roster("ogrenci_kodu,ogrenci_adi\n,Nobody\n\n1001,Ayşe\n");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_quoted_fields() {
        let roster = parse_roster("ogrenci_kodu,ogrenci_adi\n1001,\"Yılmaz, Ayşe \"\"Ace\"\"\"\n");
        assert_eq!(roster.display_name("1001"), "Yılmaz, Ayşe \"Ace\"");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_roster("").is_empty());
        assert!(parse_roster("ogrenci_kodu,ogrenci_adi\n").is_empty());
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let roster = parse_roster("\u{feff}ogrenci_kodu,ogrenci_adi\r\n1001,Ayşe\r\n");
        assert_eq!(roster.display_name("1001"), "Ayşe");
    }
}
