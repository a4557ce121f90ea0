use chrono::TimeDelta;
use tessera::duration::{milliseconds, normalize, normalize_range, normalize_with, parse_duration};
use tessera::error::TesseraError;

#[test]
fn days_and_hours_become_milliseconds() {
    assert_eq!(normalize("1d 2h"), "93600000");
    assert_eq!(normalize("wait `1d 2h` please"), "wait `93600000` please");
}

#[test]
fn surrounding_whitespace_is_kept() {
    assert_eq!(normalize("wait 1d 2h please"), "wait 93600000 please");
    assert_eq!(normalize("  5s  "), "  5000  ");
}

#[test]
fn every_component() {
    let ms = 86_400_000 + 2 * 3_600_000 + 3 * 60_000 + 4 * 1000 + 500;
    assert_eq!(normalize("1d 2h 3m 4s 500ms"), ms.to_string());
    assert_eq!(normalize("1d2h3m4s500ms"), ms.to_string());
    assert_eq!(normalize("30m"), "1800000");
    assert_eq!(normalize("250ms"), "250");
}

#[test]
fn short_milliseconds_are_not_minutes() {
    assert_eq!(normalize("10ms"), "10");
    assert_eq!(normalize("wait(5ms)"), "wait(5)");
    assert_eq!(normalize("1h 10ms"), "3600010");
}

#[test]
fn literals_inside_code() {
    assert_eq!(normalize("randomt(1s,1d)"), "randomt(1000,86400000)");
    assert_eq!(normalize("delay(2m) + 1"), "delay(120000) + 1");
}

#[test]
fn plain_integers_are_left_alone() {
    for text in ["42", "1 + 2", "93600000", "ri(1,100)", "", "   "] {
        assert_eq!(normalize(text), text);
        assert_eq!(normalize(&normalize(text)), normalize(text));
    }
}

#[test]
fn custom_replacer() {
    let seconds = normalize_with("sleep(1m 30s)", |d: TimeDelta| format!("{}s", d.num_seconds()));
    assert_eq!(seconds, "sleep(90s)");
    let mut seen = Vec::new();
    normalize_with("1s then 2s", |d| {
        seen.push(d);
        milliseconds(d)
    });
    assert_eq!(seen, vec![TimeDelta::seconds(1), TimeDelta::seconds(2)]);
}

#[test]
fn only_the_requested_range_is_rewritten() {
    let text = "1s and 1s";
    assert_eq!(normalize_range(text, 0..2, milliseconds).unwrap(), "1000 and 1s");
    assert_eq!(normalize_range(text, 7..9, milliseconds).unwrap(), "1s and 1000");
    assert_eq!(
        normalize_range(text, 3..20, milliseconds).unwrap_err(),
        TesseraError::OutOfRange { position: 20, length: 9 }
    );
}

#[test]
fn parse_single_literal() {
    assert_eq!(parse_duration("1d 2h"), Some(TimeDelta::hours(26)));
    assert_eq!(parse_duration(" 15ms "), Some(TimeDelta::milliseconds(15)));
    assert_eq!(parse_duration("1m"), Some(TimeDelta::minutes(1)));
    assert_eq!(parse_duration("1d later"), None);
    assert_eq!(parse_duration("42"), None);
    assert_eq!(parse_duration(""), None);
}
