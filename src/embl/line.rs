//! Line classification for EMBL-style flat-file records.

/// One classified line of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `ID` line; holds the text after the tag.
    Identification(&'a str),
    /// `DE` line; holds the text after the tag.
    Description(&'a str),
    /// `FT` line. `key` is empty on continuation lines; `body` is the trimmed
    /// location or qualifier text.
    Feature { key: &'a str, body: &'a str },
    /// The `SQ` line opening the sequence section.
    SequenceHeader,
    /// Any line after `SQ`.
    SequenceData(&'a str),
    Other,
}

/// Classify every line of a record. Lines after the `SQ` header are sequence data
/// regardless of their prefix.
#[must_use]
pub fn classify<'a>(lines: &[&'a str]) -> Vec<LineKind<'a>> {
    let mut in_sequence = false;
    lines
        .iter()
        .map(|&line| {
            if in_sequence {
                return LineKind::SequenceData(line);
            }
            let (tag, rest) = split_tag(line);
            match tag {
                "ID" => LineKind::Identification(rest.trim()),
                "DE" => LineKind::Description(rest.trim()),
                "FT" => parse_feature(rest),
                "SQ" => {
                    in_sequence = true;
                    LineKind::SequenceHeader
                }
                _ => LineKind::Other,
            }
        })
        .collect()
}

fn split_tag(line: &str) -> (&str, &str) {
    match (line.get(..2), line.get(2..)) {
        (Some(tag), Some(rest)) => (tag, rest),
        _ => (line, ""),
    }
}

/// Feature keys start three spaces after the `FT` tag; continuation lines are
/// indented further.
fn parse_feature(rest: &str) -> LineKind<'_> {
    let indent = rest.len() - rest.trim_start().len();
    let content = rest.trim();
    if indent == 3 && !content.is_empty() {
        let (key, body) = content
            .split_once(char::is_whitespace)
            .unwrap_or((content, ""));
        LineKind::Feature {
            key,
            body: body.trim(),
        }
    } else {
        LineKind::Feature {
            key: "",
            body: content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tags() {
        let lines = [
            "ID   HLA00001; SV 1; standard; DNA; HUM; 3503 BP.",
            "DE   HLA-A*01:01:01:01, Human MHC Class I sequence",
            "FT   CDS             join(1..73,204..473)",
            "FT                   /codon_start=1",
            "XX",
            "SQ   Sequence 3503 BP; 822 A; 1044 C; 1003 G; 634 T; 0 other;",
            "     cagaagcaga gggggtcagg gcgaagtccc agggccccag gcgtggctct        60",
        ];
        let kinds = classify(&lines);
        assert_eq!(
            kinds[0],
            LineKind::Identification("HLA00001; SV 1; standard; DNA; HUM; 3503 BP.")
        );
        assert_eq!(
            kinds[1],
            LineKind::Description("HLA-A*01:01:01:01, Human MHC Class I sequence")
        );
        assert_eq!(
            kinds[2],
            LineKind::Feature {
                key: "CDS",
                body: "join(1..73,204..473)"
            }
        );
        assert_eq!(
            kinds[3],
            LineKind::Feature {
                key: "",
                body: "/codon_start=1"
            }
        );
        assert_eq!(kinds[4], LineKind::Other);
        assert_eq!(kinds[5], LineKind::SequenceHeader);
        assert!(matches!(kinds[6], LineKind::SequenceData(_)));
    }

    #[test]
    fn tags_after_sequence_header_are_data() {
        let lines = ["SQ   Sequence 6 BP;", "FT   acgtac"];
        let kinds = classify(&lines);
        assert_eq!(kinds[1], LineKind::SequenceData("FT   acgtac"));
    }

    #[test]
    fn short_lines() {
        let kinds = classify(&["", "F", "XX"]);
        assert!(kinds.iter().all(|k| *k == LineKind::Other));
    }
}
