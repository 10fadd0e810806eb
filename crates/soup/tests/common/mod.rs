//! Shared fixtures for integration tests

#![allow(dead_code)]

use soup::{Document, Signal};

/// Route library logs to the test harness (RUST_LOG-style filtering is
/// left to the default subscriber)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Minimal markup reader: tags, quoted attributes, `<x/>`, raw text
pub fn signals(markup: &str) -> Vec<Signal> {
    let mut out = Vec::new();
    let mut rest = markup;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').expect("unterminated end tag");
            out.push(Signal::end(after[..end].trim()));
            rest = &after[end + 1..];
        } else if let Some(after) = rest.strip_prefix('<') {
            let end = after.find('>').expect("unterminated start tag");
            let tag = &after[..end];
            let (tag, self_closing) = match tag.strip_suffix('/') {
                Some(inner) => (inner, true),
                None => (tag, false),
            };
            let (name, attrs) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            out.push(Signal::start(name, attributes(attrs)));
            if self_closing {
                out.push(Signal::end(name));
            }
            rest = &after[end + 1..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            out.push(Signal::text(&rest[..end]));
            rest = &rest[end..];
        }
    }
    out
}

fn attributes(mut rest: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    rest = rest.trim_start();
    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = &rest[name_end..];
        match rest.strip_prefix('=') {
            Some(quoted) => {
                let quote = quoted.chars().next().expect("missing attribute value");
                let body = &quoted[quote.len_utf8()..];
                let close = body.find(quote).expect("unterminated attribute value");
                out.push((name.to_string(), body[..close].to_string()));
                rest = &body[close + quote.len_utf8()..];
            }
            None => out.push((name.to_string(), String::new())),
        }
        rest = rest.trim_start();
    }
    out
}

pub fn parse(markup: &str) -> Document {
    Document::from_signals(signals(markup)).expect("fixture markup builds")
}

/// `<ul>` with `k` `<li>` children numbered from 1
pub fn list(k: usize) -> Document {
    let items: String = (1..=k).map(|i| format!("<li id=\"{i}\">{i}</li>")).collect();
    parse(&format!("<ul>{items}</ul>"))
}
