//! Terminal panels.
//!
//! Stand-ins for the charts and tables of a graphical dashboard: a
//! horizontal bar chart for keyword counts, a preview table of collected
//! articles, and the district registration summary.

use crate::models::{ArticleRecord, KeywordRanking};
use crate::utils::{SUMMARY_LIMIT, single_line, truncate_summary};
use crate::vehicles::{MonthlyRegistration, RegistrationSummary};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const BAR_GLYPH: char = '█';

/// Horizontal bar chart of `ranking`, longest bar for the top count.
pub fn keyword_chart(title: &str, ranking: &KeywordRanking) -> String {
    let mut out = String::new();
    writeln!(out, "{title}").unwrap();

    let label_width = ranking
        .terms()
        .iter()
        .map(|k| display_width(&k.term))
        .max()
        .unwrap_or(0);
    let max = ranking.max_count().max(1) as u64;

    for k in ranking.terms() {
        let bar = scaled(k.count as u64, max, BAR_WIDTH);
        let pad = label_width - display_width(&k.term);
        writeln!(
            out,
            "{}{} │{} {}",
            k.term,
            " ".repeat(pad),
            BAR_GLYPH.to_string().repeat(bar),
            k.count
        )
        .unwrap();
    }
    out
}

/// Table of `(date, title, press, summary)` rows.
pub fn preview_table(articles: &[ArticleRecord]) -> String {
    let mut out = String::new();
    writeln!(out, "date       │ title │ press │ summary").unwrap();
    for article in articles {
        writeln!(
            out,
            "{} │ {} │ {} │ {}",
            article.date.format("%Y-%m-%d"),
            single_line(&article.title),
            article.press,
            truncate_summary(&single_line(&article.summary), SUMMARY_LIMIT)
        )
        .unwrap();
    }
    out
}

/// Monthly series and year-over-year metrics for a district.
pub fn registration_panel(district: &str, summary: &RegistrationSummary) -> String {
    let mut out = String::new();
    writeln!(out, "🚗 {district} 영업용 승용차 등록 통계\n").unwrap();

    let max = summary.months().map(|m| m.count).max().unwrap_or(0).max(1);
    for m in summary.months() {
        writeln!(
            out,
            "{} │{} {}",
            m.month.format("%Y-%m"),
            BAR_GLYPH.to_string().repeat(scaled(m.count, max, BAR_WIDTH)),
            m.count
        )
        .unwrap();
    }

    let span = |months: &[MonthlyRegistration]| match (months.first(), months.last()) {
        (Some(first), Some(last)) => format!(
            "{}~{}",
            first.month.format("%Y-%m"),
            last.month.format("%Y-%m")
        ),
        _ => String::new(),
    };

    writeln!(out).unwrap();
    writeln!(
        out,
        "{} 평균 등록수: {:.0}대",
        span(&summary.previous),
        summary.previous_avg
    )
    .unwrap();
    writeln!(
        out,
        "{} 평균 등록수: {:.0}대",
        span(&summary.recent),
        summary.recent_avg
    )
    .unwrap();
    match summary.change_rate() {
        Some(rate) => writeln!(
            out,
            "전년 대비 변화: {:+.0}대 ({:+.1}%)",
            summary.difference(),
            rate
        )
        .unwrap(),
        None => writeln!(out, "전년 대비 변화: {:+.0}대", summary.difference()).unwrap(),
    }
    out
}

/// Length of a bar for `value` when `max` fills `width` cells.
fn scaled(value: u64, max: u64, width: usize) -> usize {
    ((value as f64 / max as f64) * width as f64).round() as usize
}

/// Terminal columns taken by `text`; Hangul and other wide glyphs take two.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c >= '\u{1100}' { 2 } else { 1 }).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordCount;
    use crate::vehicles::summarize;
    use chrono::NaiveDate;

    fn ranking() -> KeywordRanking {
        KeywordRanking::from_ordered(vec![
            KeywordCount {
                term: "전기차".to_string(),
                count: 4,
            },
            KeywordCount {
                term: "확대".to_string(),
                count: 1,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_keyword_chart_scales_bars() {
        let chart = keyword_chart("키워드", &ranking());
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "키워드");
        assert_eq!(lines[1].matches(BAR_GLYPH).count(), BAR_WIDTH);
        assert_eq!(lines[2].matches(BAR_GLYPH).count(), BAR_WIDTH / 4);
        assert!(lines[1].ends_with(" 4"));
        // Labels are padded to the same display width.
        let label = |line: &str| display_width(&line[..line.find('│').unwrap()]);
        assert_eq!(label(lines[1]), label(lines[2]));
    }

    #[test]
    fn test_preview_table_rows() {
        let articles = vec![ArticleRecord {
            title: "법인차\n번호판".to_string(),
            press: "연합뉴스".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            summary: "요약".to_string(),
            url: "https://n.example/1".to_string(),
        }];
        let table = preview_table(&articles);
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("2025-01-15 │ 법인차 번호판 │ 연합뉴스 │ 요약"));
    }

    #[test]
    fn test_registration_panel_metrics() {
        let series: Vec<MonthlyRegistration> = (0..24)
            .map(|i| MonthlyRegistration {
                month: NaiveDate::from_ymd_opt(2023 + i / 12, (i % 12) as u32 + 1, 1).unwrap(),
                count: if i < 12 { 1000 } else { 900 },
            })
            .collect();
        let panel = registration_panel("강남구", &summarize(&series).unwrap());

        assert!(panel.contains("2023-01~2023-12 평균 등록수: 1000대"));
        assert!(panel.contains("2024-01~2024-12 평균 등록수: 900대"));
        assert!(panel.contains("전년 대비 변화: -100대 (-10.0%)"));
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("ab"), 2);
        assert_eq!(display_width("전기차"), 6);
    }
}
