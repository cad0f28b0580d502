//! Command-sequence signatures.
//!
//! A signature is the string of command letters of a path (`M`, `L`, `C`,
//! `Z`). The classifier uses it as a cheap key to decide which geometric
//! fits are worth attempting before doing any arithmetic.

use std::fmt;

use super::PathCommand;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn of(commands: &[PathCommand]) -> Self {
        Signature(commands.iter().map(PathCommand::letter).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_closed(&self) -> bool {
        self.0.ends_with('Z')
    }

    /// Letters after the leading moveto, without a trailing closepath.
    /// None when the path does not start with exactly one moveto.
    fn body(&self) -> Option<&str> {
        let rest = self.0.strip_prefix('M')?;
        let rest = rest.strip_suffix('Z').unwrap_or(rest);
        if rest.contains('M') || rest.contains('Z') {
            None
        } else {
            Some(rest)
        }
    }

    fn count(body: &str, letter: char) -> usize {
        body.chars().filter(|&c| c == letter).count()
    }

    /// A single subpath: one moveto followed by drawing commands
    pub fn is_single_subpath(&self) -> bool {
        self.body().is_some_and(|b| !b.is_empty())
    }

    /// Three or four straight sides: `MLLLZ`, `MLLLLZ`, or `MLLLL` when the
    /// last line returns to the start
    pub fn is_rect_candidate(&self) -> bool {
        match self.body() {
            Some(b) => {
                b.chars().all(|c| c == 'L') && (b.len() == 4 || (b.len() == 3 && self.is_closed()))
            }
            None => false,
        }
    }

    /// Four straight sides alternating with four corner curves, optionally
    /// with a final closing line. On a closed path the closepath may draw
    /// the fourth side.
    pub fn is_rounded_box_candidate(&self) -> bool {
        let Some(b) = self.body() else { return false };
        let lines = Self::count(b, 'L');
        let enough_lines = lines == 4 || lines == 5 || (lines == 3 && self.is_closed());
        Self::count(b, 'C') == 4 && enough_lines && !b.contains("CC")
    }

    /// Curves only, at least three of them: `MCCCZ`, `MCCCCZ`, `MCCCC`...
    pub fn is_circle_candidate(&self) -> bool {
        match self.body() {
            Some(b) => b.len() >= 3 && b.chars().all(|c| c == 'C'),
            None => false,
        }
    }

}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_path_data;

    fn sig(d: &str) -> Signature {
        parse_path_data(d).expect("valid path data").signature()
    }

    #[test]
    fn signature_of_rectangle() {
        insta::assert_snapshot!(sig("M0 0 H10 V5 H0 Z"), @"MLLLZ");
    }

    #[test]
    fn signature_of_circle() {
        insta::assert_snapshot!(
            sig("M1 0 C1 1 1 1 0 1 C-1 1 -1 1 -1 0 C-1 -1 -1 -1 0 -1 C1 -1 1 -1 1 0 Z"),
            @"MCCCCZ"
        );
    }

    #[test]
    fn rect_candidates() {
        assert!(sig("M0 0 L1 0 L1 1 L0 1 Z").is_rect_candidate());
        assert!(sig("M0 0 L1 0 L1 1 L0 1 L0 0").is_rect_candidate());
        assert!(sig("M0 0 L1 0 L1 1 L0 1 L0 0 Z").is_rect_candidate());
        assert!(!sig("M0 0 L1 0 L1 1 L0 1").is_rect_candidate());
        assert!(!sig("M0 0 L1 0 L1 1 L0 1 L0 0 L1 0").is_rect_candidate());
    }

    #[test]
    fn rounded_box_candidates() {
        assert!(Signature("MLCLCLCLCZ".into()).is_rounded_box_candidate());
        assert!(Signature("MCLCLCLCLZ".into()).is_rounded_box_candidate());
        assert!(!Signature("MLCCLCLCZ".into()).is_rounded_box_candidate());
    }

    #[test]
    fn closepath_can_draw_the_last_rounded_box_side() {
        assert!(Signature("MCLCLCLCZ".into()).is_rounded_box_candidate());
        assert!(!Signature("MCLCLCLC".into()).is_rounded_box_candidate());
    }

    #[test]
    fn circle_candidates() {
        assert!(Signature("MCCCCZ".into()).is_circle_candidate());
        assert!(Signature("MCCC".into()).is_circle_candidate());
        assert!(!Signature("MCCLZ".into()).is_circle_candidate());
        assert!(!Signature("MCC".into()).is_circle_candidate());
    }

    #[test]
    fn multiple_subpaths_are_not_single() {
        let s = Signature("MLLMLL".into());
        assert!(!s.is_single_subpath());
        assert!(Signature("MLL".into()).is_single_subpath());
    }
}
