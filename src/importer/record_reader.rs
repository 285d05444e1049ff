// ==========================================
// 订单导入核心 - 分隔符文本读取器
// ==========================================
// 职责: 原始文本 → 表头 + 数据行（惰性）
// 规则: 空行丢弃；首个非空行为表头；字段数不足的行结构性跳过
// 工具: csv crate（flexible 模式，允许行长度不一致）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::import::SkippedLine;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// RecordLine - 读取结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine {
    /// 可用数据行
    Data { line_number: u64, fields: Vec<String> },
    /// 结构性跳过
    Skipped(SkippedLine),
}

// ==========================================
// RecordReader
// ==========================================
pub struct RecordReader {
    delimiter: u8,
    min_fields: usize,
    quoting: bool,
}

impl RecordReader {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            min_fields: config.min_fields,
            quoting: config.quoting,
        }
    }

    /// 读取表头，返回惰性数据行迭代器
    pub fn read<'a>(&self, text: &'a str) -> DelimitedRecords<'a> {
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(self.quoting)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut header = Vec::new();
        let mut record = StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    if is_blank(&record) {
                        continue;
                    }
                    header = record
                        .iter()
                        .map(|h| h.trim().trim_start_matches(UTF8_BOM).to_string())
                        .collect();
                    break;
                }
                Ok(false) => break,
                Err(e) => {
                    warn!(error = %e, "表头行读取失败，尝试下一行");
                }
            }
        }
        debug!(columns = header.len(), "表头读取完成");

        DelimitedRecords {
            header,
            records: reader.into_records(),
            min_fields: self.min_fields,
        }
    }
}

// ==========================================
// DelimitedRecords - 惰性数据行
// ==========================================
pub struct DelimitedRecords<'a> {
    header: Vec<String>,
    records: StringRecordsIntoIter<&'a [u8]>,
    min_fields: usize,
}

impl<'a> DelimitedRecords<'a> {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// 拆出表头与数据行迭代器
    pub fn into_parts(self) -> (Vec<String>, DataLines<'a>) {
        (
            self.header,
            DataLines {
                records: self.records,
                min_fields: self.min_fields,
            },
        )
    }
}

pub struct DataLines<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    min_fields: usize,
}

impl Iterator for DataLines<'_> {
    type Item = RecordLine;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    let line_number = e.position().map(|p| p.line()).unwrap_or(0);
                    return Some(RecordLine::Skipped(SkippedLine {
                        line_number,
                        field_count: 0,
                        reason: format!("行读取失败: {}", e),
                    }));
                }
            };

            if is_blank(&record) {
                continue;
            }

            let line_number = record.position().map(|p| p.line()).unwrap_or(0);
            let field_count = record.len();
            if field_count < self.min_fields {
                return Some(RecordLine::Skipped(SkippedLine {
                    line_number,
                    field_count,
                    reason: format!("字段数 {} 少于最少字段数 {}", field_count, self.min_fields),
                }));
            }

            return Some(RecordLine::Data {
                line_number,
                fields: record.iter().map(str::to_string).collect(),
            });
        }
    }
}

/// 空白行：单个字段且仅含空白
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> (Vec<String>, Vec<RecordLine>) {
        let reader = RecordReader::new(&ImportConfig::default());
        let (header, lines) = reader.read(text).into_parts();
        (header, lines.collect())
    }

    #[test]
    fn test_header_and_rows() {
        let (header, lines) = read_all(" A ; B ;C\n1;2;3\n4;5;6\n");

        assert_eq!(header, vec!["A", "B", "C"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            RecordLine::Data {
                line_number: 2,
                fields: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            }
        );
    }

    #[test]
    fn test_blank_lines_discarded() {
        let (header, lines) = read_all("\n\n  \nA;B;C\n\n1;2;3\n   \n4;5;6\n\n");

        assert_eq!(header, vec!["A", "B", "C"]);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| matches!(l, RecordLine::Data { .. })));
    }

    #[test]
    fn test_short_line_skipped() {
        let (_, lines) = read_all("A;B;C;D\n1;2;3;4\njunk\n5;6\n7;8;9\n");

        assert_eq!(lines.len(), 4);
        match &lines[1] {
            RecordLine::Skipped(skip) => {
                assert_eq!(skip.line_number, 3);
                assert_eq!(skip.field_count, 1);
            }
            other => panic!("应为跳过行: {:?}", other),
        }
        assert!(matches!(lines[2], RecordLine::Skipped(_)));
        // 三个字段即达标，短于表头也保留
        assert!(matches!(lines[3], RecordLine::Data { .. }));
    }

    #[test]
    fn test_header_available_before_data_lines() {
        let reader = RecordReader::new(&ImportConfig::default());
        let records = reader.read("\n A ;B;C\n1;2;3\n");

        assert_eq!(records.header().to_vec(), vec!["A", "B", "C"]);
        let (header, lines) = records.into_parts();
        assert_eq!(header.len(), 3);
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let (header, _) = read_all("\u{feff}Paket Numarası;B;C\n1;2;3\n");
        assert_eq!(header[0], "Paket Numarası");
    }

    #[test]
    fn test_quotes_are_literal_by_default() {
        let (_, lines) = read_all("A;B;C\n\"15\" ekran;2;3\n");
        match &lines[0] {
            RecordLine::Data { fields, .. } => assert_eq!(fields[0], "\"15\" ekran"),
            other => panic!("应为数据行: {:?}", other),
        }
    }

    #[test]
    fn test_quoting_enabled() {
        let config = ImportConfig {
            quoting: true,
            ..ImportConfig::default()
        };
        let reader = RecordReader::new(&config);
        let (_, lines) = reader.read("A;B;C\n\"x;y\";2;3\n").into_parts();
        let lines: Vec<_> = lines.collect();
        match &lines[0] {
            RecordLine::Data { fields, .. } => assert_eq!(fields[0], "x;y"),
            other => panic!("应为数据行: {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_header_only_input() {
        let (header, lines) = read_all("");
        assert!(header.is_empty());
        assert!(lines.is_empty());

        let (header, lines) = read_all("A;B;C\n");
        assert_eq!(header.len(), 3);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let (header, lines) = read_all("A;B;C\r\n1;2;3\r\n");
        assert_eq!(header, vec!["A", "B", "C"]);
        assert_eq!(lines.len(), 1);
    }
}
