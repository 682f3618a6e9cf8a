// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Placeholder substitution for the XML and FLT templates.
//!
//! Templates use `{name}` substitution points; `{{` and `}}` stand for literal
//! braces, which the simulator's calculator formulas (`if{ ... }`) need.

use crate::error::TemplateError;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, char},
    combinator::{map, recognize, value},
    multi::many0_count,
    sequence::{delimited, pair},
    IResult,
};

pub const MISSION_XML: &str = include_str!("../templates/mission.xml_template");
pub const LEG_END_TRIGGER_XML: &str = include_str!("../templates/leg_end_trigger.xml_template");

#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        value(Segment::Text("{"), tag("{{")),
        value(Segment::Text("}"), tag("}}")),
        map(delimited(char('{'), identifier, char('}')), Segment::Placeholder),
        map(is_not("{}"), Segment::Text),
    ))(input)
}

/// Fills every `{name}` of `template` from `values`. Extra values are ignored.
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while !rest.is_empty() {
        let (next, seg) =
            segment(rest).map_err(|_| TemplateError::UnbalancedBrace(template.len() - rest.len()))?;
        match seg {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(name) => {
                let (_, val) = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
                out.push_str(val);
            }
        }
        rest = next;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_and_unescapes() {
        let out = render(
            "<A id=\"{id}\">if{{ [x] }} {id}</A>",
            &[("id", "{ABC}"), ("unused", "x")],
        )
        .unwrap();
        assert_eq!(out, "<A id=\"{ABC}\">if{ [x] } {ABC}</A>");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = render("hello {who}", &[("name", "x")]).unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("who".to_string()));
    }

    #[test]
    fn test_unbalanced_brace() {
        assert_eq!(
            render("abc { def", &[]).unwrap_err(),
            TemplateError::UnbalancedBrace(4)
        );
        assert_eq!(
            render("abc } def", &[]).unwrap_err(),
            TemplateError::UnbalancedBrace(4)
        );
    }

    #[test]
    fn test_bundled_templates_are_well_formed() {
        // Every placeholder of the bundled templates must be a plain identifier
        let mut rest = MISSION_XML;
        while !rest.is_empty() {
            let (next, _) = segment(rest).expect("mission template parses");
            rest = next;
        }
        let mut rest = LEG_END_TRIGGER_XML;
        while !rest.is_empty() {
            let (next, _) = segment(rest).expect("trigger template parses");
            rest = next;
        }
    }
}
