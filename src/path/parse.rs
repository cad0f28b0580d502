//! SVG path-data parsing.
//!
//! Relative commands are resolved against the current point, `H`/`V` become
//! straight lines, and extra coordinate groups after a moveto are implicit
//! linetos, as in SVG.

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest_derive::Parser;

use super::{PathCommand, RawPath};
use crate::errors::PathDataError;
use crate::types::Point;

#[derive(Parser)]
#[grammar = "path/path_data.pest"]
struct PathDataParser;

const SOURCE_NAME: &str = "<path data>";

fn named_source(d: &str) -> NamedSource<String> {
    NamedSource::new(SOURCE_NAME, d.to_string())
}

/// Parse an SVG path-data string into absolute commands.
pub fn parse_path_data(d: &str) -> Result<RawPath, PathDataError> {
    let pairs = PathDataParser::parse(Rule::path_data, d).map_err(|e| {
        let span: SourceSpan = match e.location {
            InputLocation::Pos(p) => (p, 0).into(),
            InputLocation::Span((start, end)) => (start, end - start).into(),
        };
        PathDataError::Syntax {
            src: named_source(d),
            span,
            expected: e.variant.message().into_owned(),
        }
    })?;

    let mut commands = Vec::new();
    let mut current = Point::ORIGIN;
    let mut subpath_start = Point::ORIGIN;

    let command_pairs = pairs
        .flat_map(|p| p.into_inner())
        .filter(|p| p.as_rule() == Rule::command);

    for command in command_pairs {
        let span = command.as_span();
        let span: SourceSpan = (span.start(), span.end() - span.start()).into();
        let mut inner = command.into_inner();
        let Some(letter) = inner.next().and_then(|p| p.as_str().chars().next()) else {
            continue;
        };
        let mut args = Vec::new();
        for number in inner {
            let value = number.as_str().parse::<f64>().map_err(|_| PathDataError::Syntax {
                src: named_source(d),
                span: (number.as_span().start(), number.as_str().len()).into(),
                expected: "a number".to_string(),
            })?;
            args.push(value);
        }

        if commands.is_empty() && !matches!(letter, 'M' | 'm') {
            return Err(PathDataError::MissingMoveTo {
                src: named_source(d),
                span,
            });
        }

        let relative = letter.is_ascii_lowercase();
        let group = match letter.to_ascii_uppercase() {
            'M' | 'L' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            _ => 0,
        };
        let arity_ok = if group == 0 {
            args.is_empty()
        } else {
            !args.is_empty() && args.len() % group == 0
        };
        if !arity_ok {
            return Err(PathDataError::Arity {
                command: letter,
                got: args.len(),
                group,
                src: named_source(d),
                span,
            });
        }

        let resolve = |base: Point, x: f64, y: f64| {
            if relative {
                Point::new(base.x + x, base.y + y)
            } else {
                Point::new(x, y)
            }
        };

        match letter.to_ascii_uppercase() {
            'M' => {
                for (i, xy) in args.chunks_exact(2).enumerate() {
                    current = resolve(current, xy[0], xy[1]);
                    if i == 0 {
                        subpath_start = current;
                        commands.push(PathCommand::MoveTo(current));
                    } else {
                        commands.push(PathCommand::LineTo(current));
                    }
                }
            }
            'L' => {
                for xy in args.chunks_exact(2) {
                    current = resolve(current, xy[0], xy[1]);
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'H' => {
                for &x in &args {
                    current.x = if relative { current.x + x } else { x };
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'V' => {
                for &y in &args {
                    current.y = if relative { current.y + y } else { y };
                    commands.push(PathCommand::LineTo(current));
                }
            }
            'C' => {
                for c in args.chunks_exact(6) {
                    let c1 = resolve(current, c[0], c[1]);
                    let c2 = resolve(current, c[2], c[3]);
                    let to = resolve(current, c[4], c[5]);
                    commands.push(PathCommand::CubicTo { c1, c2, to });
                    current = to;
                }
            }
            _ => {
                commands.push(PathCommand::Close);
                current = subpath_start;
            }
        }
    }

    Ok(RawPath::new(commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_absolute_square() {
        let path = parse_path_data("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        assert_eq!(path.commands.len(), 5);
        assert_eq!(path.commands[2], PathCommand::LineTo(Point::new(10.0, 10.0)));
        assert!(path.is_closed());
    }

    #[test]
    fn parse_relative_and_axis_commands() {
        let path = parse_path_data("m1,1 h4 v3 l-4,0 z").unwrap();
        assert_eq!(
            path.end_points(),
            vec![
                Point::new(1.0, 1.0),
                Point::new(5.0, 1.0),
                Point::new(5.0, 4.0),
                Point::new(1.0, 4.0),
            ]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let path = parse_path_data("M0 0 5 0 5 5").unwrap();
        insta::assert_snapshot!(path.signature(), @"MLL");
    }

    #[test]
    fn relative_cubic_resolves_against_start() {
        let path = parse_path_data("M10 10 c0 5 5 10 10 10").unwrap();
        assert_eq!(
            path.commands[1],
            PathCommand::CubicTo {
                c1: Point::new(10.0, 15.0),
                c2: Point::new(15.0, 20.0),
                to: Point::new(20.0, 20.0),
            }
        );
    }

    #[test]
    fn packed_numbers_without_separators() {
        let path = parse_path_data("M0-1L.5.5").unwrap();
        assert_eq!(path.end_points(), vec![Point::new(0.0, -1.0), Point::new(0.5, 0.5)]);
    }

    #[test]
    fn close_returns_pen_to_subpath_start() {
        let path = parse_path_data("M2 2 l3 0 l0 3 z l1 1").unwrap();
        assert_eq!(path.commands.last(), Some(&PathCommand::LineTo(Point::new(3.0, 3.0))));
    }

    #[test]
    fn missing_moveto_is_an_error() {
        let err = parse_path_data("L1 1").unwrap_err();
        assert!(matches!(err, PathDataError::MissingMoveTo { .. }));
    }

    #[test]
    fn odd_coordinate_count_is_an_error() {
        let err = parse_path_data("M0 0 L1").unwrap_err();
        match err {
            PathDataError::Arity { command, got, group, .. } => {
                assert_eq!(command, 'L');
                assert_eq!(got, 1);
                assert_eq!(group, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_command_is_a_syntax_error() {
        let err = parse_path_data("M0 0 Q1 1 2 2").unwrap_err();
        assert!(matches!(err, PathDataError::Syntax { .. }));
    }

    #[test]
    fn empty_input_is_an_empty_path() {
        assert!(parse_path_data("   ").unwrap().is_empty());
    }
}
