//! Record extraction from a captured page snapshot.
//!
//! The schedule list is virtualized: only a window of items exists in the DOM
//! at any moment, and the same items resurface across scroll passes.
//! Extraction is a pure pass over the captured HTML; the controller runs it
//! every cycle and leaves deduplication to the store. Malformed containers
//! contribute nothing and never fail a pass.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::harvest::dates::{LABEL_TODAY, LABEL_TOMORROW};
use crate::models::RawCandidate;

/// Item containers: real schedule rows carry a broadcast time attribute or
/// the list row class.
const CONTAINER_SELECTOR: &str = "[data-time], ._1jauv3p0";
/// Product links inside a container, by href query or data attribute.
const CODE_LINK_SELECTOR: &str = r#"a[href*="slitmCd="], [data-slitm-cd], [data-slitm_cd]"#;
/// Secondary sources for the product name when the link text is unusable.
const NAME_FALLBACK_SELECTOR: &str = r#"[aria-label="제품명"], .pdname, .h84bfs5 span"#;

/// Emitted when a container carries no parseable broadcast time.
pub const NO_TIME_INFO: &str = "시간정보없음";

/// Names shorter than this are navigation noise, not products.
const MIN_NAME_CHARS: usize = 2;

/// Extracts every resolvable schedule candidate from an HTML snapshot.
pub fn extract_candidates(html: &str) -> Vec<RawCandidate> {
    let document = Html::parse_document(html);
    let containers = Selector::parse(CONTAINER_SELECTOR).unwrap();
    let code_links = Selector::parse(CODE_LINK_SELECTOR).unwrap();
    let name_fallback = Selector::parse(NAME_FALLBACK_SELECTOR).unwrap();

    let time_re = Regex::new(r"\d{2}:\d{2}").expect("valid time regex");
    let month_day_re = Regex::new(r"\d{1,2}월\s*\d{1,2}일").expect("valid month-day regex");
    let code_re = Regex::new(r"slitmCd=(\d+)").expect("valid item-code regex");
    let discount_re = Regex::new(r"\d+%.*").expect("valid discount-suffix regex");

    let mut candidates = Vec::new();
    for container in document.select(&containers) {
        let text = collect_text(container);
        let time_label = container_time(container, &text, &time_re);
        let date_label = container_date(&text, &month_day_re);

        for link in container.select(&code_links) {
            let code = match link_code(link, &code_re) {
                Some(code) => code,
                None => continue,
            };
            let name = match link_name(link, container, &name_fallback, &discount_re) {
                Some(name) => name,
                None => continue,
            };
            candidates.push(RawCandidate {
                time_label: time_label.clone(),
                date_label: date_label.clone(),
                code,
                name,
            });
        }
    }
    candidates
}

/// Resolves the broadcast time for a container.
///
/// The structured `data-time` attribute wins when present; it may carry a
/// leading date part and a `~` range, of which only the starting HH:MM is
/// kept. Without the attribute, the first HH:MM in the container text is
/// used. Neither resolving yields the sentinel label.
fn container_time(container: ElementRef, text: &str, time_re: &Regex) -> String {
    let mut time = container
        .value()
        .attr("data-time")
        .unwrap_or_default()
        .to_string();
    if let Some((_, rest)) = time.split_once(' ') {
        time = rest.to_string();
    }

    if time.is_empty() {
        if let Some(found) = time_re.find(text) {
            time = found.as_str().to_string();
        }
    } else if let Some(found) = time_re.find(&time) {
        time = found.as_str().to_string();
    }

    if time.is_empty() {
        time = NO_TIME_INFO.to_string();
    }
    time
}

/// Picks the date cue out of the container text. An explicit `M월 D일` label
/// beats the relative words; a container with no cue at all belongs to the
/// reference date.
fn container_date(text: &str, month_day_re: &Regex) -> String {
    if let Some(found) = month_day_re.find(text) {
        found.as_str().to_string()
    } else if text.contains(LABEL_TOMORROW) {
        LABEL_TOMORROW.to_string()
    } else {
        LABEL_TODAY.to_string()
    }
}

/// Product code from the link's data attributes, falling back to the
/// `slitmCd` query parameter in its href.
fn link_code(link: ElementRef, code_re: &Regex) -> Option<String> {
    let element = link.value();
    let attr_code = element
        .attr("data-slitm-cd")
        .or_else(|| element.attr("data-slitm_cd"))
        .filter(|code| !code.is_empty());
    if let Some(code) = attr_code {
        return Some(code.to_string());
    }

    let href = element.attr("href")?;
    code_re.captures(href).map(|caps| caps[1].to_string())
}

/// Product name: first line of the link text with any trailing discount
/// fragment (`30% 할인` and the like) stripped. When that leaves fewer than
/// two characters, the container's dedicated name elements are consulted.
/// Still too short means the candidate is dropped.
fn link_name(
    link: ElementRef,
    container: ElementRef,
    name_fallback: &Selector,
    discount_re: &Regex,
) -> Option<String> {
    let text = collect_text(link);
    let mut name = discount_re
        .replace(first_line(text.trim()), "")
        .trim()
        .to_string();

    if name.chars().count() < MIN_NAME_CHARS {
        if let Some(element) = container.select(name_fallback).next() {
            let fallback_text = collect_text(element);
            name = first_line(fallback_text.trim()).trim().to_string();
        }
    }

    if name.chars().count() < MIN_NAME_CHARS {
        return None;
    }
    Some(name)
}

fn collect_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_attribute_is_preferred_over_container_text() {
        let html = r#"<div data-time="09:40">
            <span>방송 21:00</span>
            <a href="/md/itm?slitmCd=2095000001">프리미엄 안마의자</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].time_label, "09:40");
    }

    #[test]
    fn attribute_with_date_and_range_keeps_the_starting_time() {
        let html = r#"<div data-time="2026-02-23 09:40 ~ 10:30">
            <a href="/md/itm?slitmCd=100">프리미엄 안마의자</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].time_label, "09:40");
    }

    #[test]
    fn container_text_supplies_the_time_when_the_attribute_is_absent() {
        let html = r#"<div class="_1jauv3p0">
            <span>방송 21:00</span>
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].time_label, "21:00");
    }

    #[test]
    fn unresolvable_time_yields_the_sentinel_label() {
        let html = r#"<div class="_1jauv3p0">
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].time_label, NO_TIME_INFO);
    }

    #[test]
    fn container_without_a_product_code_yields_nothing() {
        let html = r#"<div data-time="09:40">
            <a href="/event/main">이벤트 보기</a>
        </div>"#;

        assert!(extract_candidates(html).is_empty());
    }

    #[test]
    fn code_attribute_wins_over_the_href_parameter() {
        let html = r#"<div data-time="09:40">
            <a data-slitm-cd="777" href="/md/itm?slitmCd=999">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].code, "777");
    }

    #[test]
    fn code_is_parsed_from_the_href_query() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?extra=1&slitmCd=2095000001">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].code, "2095000001");
    }

    #[test]
    fn discount_suffix_is_stripped_from_the_name() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?slitmCd=100">프리미엄 안마의자 30% 할인</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].name, "프리미엄 안마의자");
    }

    #[test]
    fn only_the_first_line_of_the_link_text_is_the_name() {
        let html = "<div data-time=\"09:40\">
            <a href=\"/md/itm?slitmCd=100\">무선 청소기 세트\n19,900원 무료배송</a>
        </div>";

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].name, "무선 청소기 세트");
    }

    #[test]
    fn short_link_text_falls_back_to_the_name_element() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?slitmCd=100">#</a>
            <span class="pdname">진짜 상품명</span>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].name, "진짜 상품명");
    }

    #[test]
    fn candidate_without_a_usable_name_is_dropped() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?slitmCd=100">#</a>
        </div>"#;

        assert!(extract_candidates(html).is_empty());
    }

    #[test]
    fn explicit_date_cue_beats_the_relative_words() {
        let html = r#"<div data-time="09:40">
            <span>내일 2월 23일 방송</span>
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].date_label, "2월 23일");
    }

    #[test]
    fn tomorrow_cue_is_detected_in_container_text() {
        let html = r#"<div data-time="09:40">
            <span>내일 방송</span>
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].date_label, "내일");
    }

    #[test]
    fn containers_without_a_date_cue_default_to_today() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates[0].date_label, "오늘");
    }

    #[test]
    fn every_link_in_a_container_shares_its_time_and_date() {
        let html = r#"<div data-time="09:40">
            <a href="/md/itm?slitmCd=100">무선 청소기 세트</a>
            <a href="/md/itm?slitmCd=200">프리미엄 안마의자</a>
        </div>"#;

        let candidates = extract_candidates(html);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].time_label, candidates[1].time_label);
        assert_ne!(candidates[0].code, candidates[1].code);
    }
}
