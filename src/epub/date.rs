//! 出版日期解析
//!
//! `dc:date` 常见的写法有完整时间戳、纯日期、年月或仅年份，统一解析为UTC时间。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::epub::error::{EpubError, Result};

/// 无时区的时间戳格式，按UTC处理
const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// 带数字时区偏移（如 `+0800`）的时间戳格式
const OFFSET_DATETIME_FORMATS: [&str; 2] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// 解析日期文本
///
/// 依次尝试：RFC 3339、带数字时区偏移的时间戳、无时区时间戳（`T`或空格分隔）、
/// `YYYY-MM-DD`、`YYYY-MM`、`YYYY`。
/// 缺省的月、日补为1，时间补为零点。都不匹配时返回 `InvalidDate`。
pub fn parse_date(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_year_month(text))
        .or_else(|| parse_year(text));

    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EpubError::InvalidDate(text.to_string()))
}

fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let (year, month) = text.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn parse_year(text: &str) -> Option<NaiveDate> {
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)
}
