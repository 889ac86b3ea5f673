//! Tokenizer and scene builder for the drawing-primitive language.
//!
//! The language is deliberately permissive: a line that matches no known
//! (keyword, token-count) pair is silently ignored, and numbers that fail
//! to parse become 0 before clamping. The only fatal outcome here is a
//! failed image decode.

use glam::ivec2;
use pest::Parser;
use std::io::BufRead;

use crate::errors::SceneError;
use crate::image::ImageDecoder;
use crate::log::debug;
use crate::scene::{Arc, Circle, Image, Line, PointMark, Primitive, PrimitiveKind, Rect, Scene, Style, Text, Triangle};
use crate::types::{self, Rgb, Rotation};
use crate::{DrawingParser, Rule};

/// Tokens beyond this count are silently dropped.
pub const MAX_TOKENS: usize = 10;

/// Split one input line into tokens.
///
/// Whitespace separates tokens, a double-quoted string is one token with
/// its content verbatim (an unterminated quote runs to end of line), and
/// `//` outside quotes comments out the rest. Never fails; malformed
/// input degrades to fewer or garbled tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    // The grammar accepts any input, but degrade to "no tokens" rather
    // than crash if that ever stops being true.
    let Ok(mut parsed) = DrawingParser::parse(Rule::line, input) else {
        return Vec::new();
    };
    let Some(line) = parsed.next() else {
        return Vec::new();
    };
    let mut tokens = Vec::new();
    for pair in line.into_inner() {
        if tokens.len() >= MAX_TOKENS {
            break;
        }
        match pair.as_rule() {
            Rule::bare => tokens.push(pair.as_str().to_string()),
            Rule::quoted => {
                let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                tokens.push(body.to_string());
            }
            _ => {} // EOI
        }
    }
    tokens
}

// ============================================================================
// Scene builder
// ============================================================================

type Handler = fn(&mut SceneBuilder, &[String]) -> Result<(), SceneError>;

/// Directive vocabulary: keyword, token count, handler. Dispatch is by
/// token count first, then case-insensitive keyword; `text` appears twice
/// because it has a rotate+scale variant.
const DIRECTIVES: &[(&str, usize, Handler)] = &[
    ("fill", 1, SceneBuilder::fill),
    ("wire", 1, SceneBuilder::wire),
    ("width", 2, SceneBuilder::width),
    ("layer", 2, SceneBuilder::layer),
    ("rotate", 2, SceneBuilder::rotate),
    ("scale", 2, SceneBuilder::scale),
    ("point", 3, SceneBuilder::point),
    ("circle", 4, SceneBuilder::circle),
    ("color", 4, SceneBuilder::color),
    ("image", 4, SceneBuilder::image),
    ("text", 4, SceneBuilder::text),
    ("rectangle", 5, SceneBuilder::rectangle),
    ("line", 5, SceneBuilder::line_segment),
    ("arc", 6, SceneBuilder::arc),
    ("text", 6, SceneBuilder::text_rotated),
    ("triangle", 7, SceneBuilder::triangle),
];

/// Interprets directive lines against the current style state, appending
/// primitives to the scene in input order.
pub struct SceneBuilder {
    cur: Style,
    scene: Scene,
    decoder: Box<dyn ImageDecoder>,
}

impl SceneBuilder {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        SceneBuilder {
            cur: Style::initial(),
            scene: Scene::new(),
            decoder,
        }
    }

    /// Consume one physical input line.
    pub fn line(&mut self, input: &str) -> Result<(), SceneError> {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Ok(());
        }
        let handler = DIRECTIVES
            .iter()
            .find(|(kw, arity, _)| *arity == tokens.len() && tokens[0].eq_ignore_ascii_case(kw));
        match handler {
            Some((_, _, handle)) => handle(self, &tokens),
            None => {
                debug!(keyword = %tokens[0], count = tokens.len(), "ignoring unrecognized directive");
                Ok(())
            }
        }
    }

    /// Consume every line from a reader.
    pub fn read(&mut self, reader: impl BufRead) -> Result<(), SceneError> {
        for line in reader.lines() {
            self.line(&line?)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Scene {
        self.scene
    }

    fn push(&mut self, style: Style, kind: PrimitiveKind) {
        self.scene.primitives.push(Primitive::new(style, kind));
    }

    // ------------------------------------------------------------------
    // State directives: pure mutations of the current style, never list
    // entries, so draw order only depends on geometry directives.
    // ------------------------------------------------------------------

    fn fill(&mut self, _t: &[String]) -> Result<(), SceneError> {
        self.cur.fill = true;
        Ok(())
    }

    fn wire(&mut self, _t: &[String]) -> Result<(), SceneError> {
        self.cur.fill = false;
        Ok(())
    }

    fn width(&mut self, t: &[String]) -> Result<(), SceneError> {
        self.cur.width = types::scale_factor(&t[1]);
        Ok(())
    }

    fn layer(&mut self, t: &[String]) -> Result<(), SceneError> {
        self.cur.layer = types::layer_index(&t[1]);
        Ok(())
    }

    fn rotate(&mut self, t: &[String]) -> Result<(), SceneError> {
        self.cur.rotate = Rotation::from_degrees(types::angle(&t[1]));
        Ok(())
    }

    fn scale(&mut self, t: &[String]) -> Result<(), SceneError> {
        self.cur.scale = types::scale_factor(&t[1]);
        Ok(())
    }

    fn color(&mut self, t: &[String]) -> Result<(), SceneError> {
        self.cur.color = Rgb::new(
            types::color_level(&t[1]),
            types::color_level(&t[2]),
            types::color_level(&t[3]),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry directives
    // ------------------------------------------------------------------

    fn point(&mut self, t: &[String]) -> Result<(), SceneError> {
        let at = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        self.push(self.cur, PointMark { at }.into());
        Ok(())
    }

    fn line_segment(&mut self, t: &[String]) -> Result<(), SceneError> {
        let a = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        let b = ivec2(types::coord(&t[3]), types::coord(&t[4]));
        // lines are always filled
        let style = Style { fill: true, ..self.cur };
        self.push(style, Line { a, b }.into());
        Ok(())
    }

    fn rectangle(&mut self, t: &[String]) -> Result<(), SceneError> {
        let a = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        let b = ivec2(types::coord(&t[3]), types::coord(&t[4]));
        self.push(self.cur, Rect { a, b }.into());
        Ok(())
    }

    fn circle(&mut self, t: &[String]) -> Result<(), SceneError> {
        let center = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        self.push(self.cur, Circle::new(center, types::radius(&t[3])).into());
        Ok(())
    }

    fn arc(&mut self, t: &[String]) -> Result<(), SceneError> {
        let center = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        // arcs are always filled
        let style = Style { fill: true, ..self.cur };
        self.push(
            style,
            Arc::new(
                center,
                types::radius(&t[3]),
                types::angle(&t[4]),
                types::delta_angle(&t[5]),
            )
            .into(),
        );
        Ok(())
    }

    fn triangle(&mut self, t: &[String]) -> Result<(), SceneError> {
        let a = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        let b = ivec2(types::coord(&t[3]), types::coord(&t[4]));
        let c = ivec2(types::coord(&t[5]), types::coord(&t[6]));
        self.push(self.cur, Triangle { a, b, c }.into());
        Ok(())
    }

    fn text(&mut self, t: &[String]) -> Result<(), SceneError> {
        let origin = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        self.push(
            self.cur,
            Text::new(origin, t[3].clone(), self.cur.scale, self.cur.rotate).into(),
        );
        Ok(())
    }

    /// `Text x y angle scale "string"`: rotation and scale apply to this
    /// primitive only, without touching the style state.
    fn text_rotated(&mut self, t: &[String]) -> Result<(), SceneError> {
        let origin = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        let rotate = Rotation::from_degrees(types::angle(&t[3]));
        let scale = types::scale_factor(&t[4]);
        let style = Style { rotate, scale, ..self.cur };
        self.push(style, Text::new(origin, t[5].clone(), scale, rotate).into());
        Ok(())
    }

    fn image(&mut self, t: &[String]) -> Result<(), SceneError> {
        let origin = ivec2(types::coord(&t[1]), types::coord(&t[2]));
        let decoded = self.decoder.decode(&t[3])?;
        // images are always filled
        let style = Style { fill: true, ..self.cur };
        self.push(
            style,
            Image::new(origin, t[3].clone(), decoded, self.cur.scale, self.cur.rotate).into(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ImageError;
    use crate::image::DecodedImage;

    // ==================== tokenizer ====================

    #[test]
    fn tokenize_simple_line() {
        assert_eq!(tokenize("Line 0 0 10 10"), ["Line", "0", "0", "10", "10"]);
    }

    #[test]
    fn tokenize_quoted_string_keeps_spaces() {
        let tokens = tokenize(r#"Text 10 20 0 5 "hello world""#);
        insta::assert_snapshot!(tokens.join("|"), @"Text|10|20|0|5|hello world");
    }

    #[test]
    fn tokenize_comment_terminates_line() {
        assert_eq!(tokenize("Point 1 2 // a note"), ["Point", "1", "2"]);
        assert!(tokenize("// whole line comment").is_empty());
    }

    #[test]
    fn tokenize_comment_inside_quotes_is_literal() {
        assert_eq!(tokenize(r#"Text 0 0 "a // b""#), ["Text", "0", "0", "a // b"]);
    }

    #[test]
    fn tokenize_unterminated_quote_extends_to_end() {
        assert_eq!(tokenize(r#"Text 0 0 "dangling"#), ["Text", "0", "0", "dangling"]);
    }

    #[test]
    fn tokenize_adjacent_comment_marker() {
        assert_eq!(tokenize("ab//cd"), ["ab"]);
    }

    #[test]
    fn tokenize_drops_excess_tokens() {
        let line = "a b c d e f g h i j k l m";
        assert_eq!(tokenize(line).len(), MAX_TOKENS);
    }

    #[test]
    fn tokenize_blank_and_whitespace_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    // ==================== scene builder ====================

    struct FakeDecoder {
        width: i32,
        height: i32,
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, _path: &str) -> Result<DecodedImage, ImageError> {
            Ok(DecodedImage {
                width: self.width,
                height: self.height,
                rgb: vec![0; (self.width * self.height * 3) as usize],
            })
        }
    }

    struct FailingDecoder;

    impl ImageDecoder for FailingDecoder {
        fn decode(&self, path: &str) -> Result<DecodedImage, ImageError> {
            Err(ImageError::Identify {
                path: path.to_string(),
            })
        }
    }

    fn builder() -> SceneBuilder {
        SceneBuilder::new(Box::new(FakeDecoder {
            width: 4,
            height: 2,
        }))
    }

    fn build(lines: &[&str]) -> Scene {
        let mut b = builder();
        for line in lines {
            b.line(line).unwrap();
        }
        b.finish()
    }

    #[test]
    fn style_state_persists_across_primitives() {
        let scene = build(&["Layer 3", "Width 5", "Point 0 0", "Point 1 1"]);
        assert_eq!(scene.primitives.len(), 2);
        for prim in &scene.primitives {
            assert_eq!(prim.style.layer, 3);
            assert_eq!(prim.style.width, 5);
        }
    }

    #[test]
    fn state_only_input_yields_empty_scene() {
        let scene = build(&["Color 10 20 30", "Width 9", "Fill"]);
        assert!(scene.is_empty());
    }

    #[test]
    fn unrecognized_directives_are_ignored() {
        let scene = build(&[
            "Nonsense 1 2 3",
            "Point 1",       // wrong arity
            "Circle 0 0",    // wrong arity
            "Point 5 5",
        ]);
        assert_eq!(scene.primitives.len(), 1);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let scene = build(&["LINE 0 0 1 1", "line 2 2 3 3", "LiNe 4 4 5 5"]);
        assert_eq!(scene.primitives.len(), 3);
    }

    #[test]
    fn fill_and_wire_toggle() {
        let scene = build(&["Fill", "Rectangle 0 0 1 1", "Wire", "Rectangle 2 2 3 3"]);
        assert!(scene.primitives[0].style.fill);
        assert!(!scene.primitives[1].style.fill);
    }

    #[test]
    fn lines_and_arcs_are_always_filled() {
        let scene = build(&["Wire", "Line 0 0 5 5", "Arc 0 0 10 0 90"]);
        assert!(scene.primitives[0].style.fill);
        assert!(scene.primitives[1].style.fill);
    }

    #[test]
    fn color_snapshot_is_captured_at_creation() {
        let scene = build(&["Color 1 2 3", "Point 0 0", "Color 9 9 9", "Point 1 1"]);
        assert_eq!(scene.primitives[0].style.color, Rgb::new(1, 2, 3));
        assert_eq!(scene.primitives[1].style.color, Rgb::new(9, 9, 9));
    }

    #[test]
    fn text_with_rotate_and_scale_variant() {
        let scene = build(&[r#"Text 10 20 90 5 "hi""#, "Point 0 0"]);
        let prim = &scene.primitives[0];
        assert_eq!(prim.style.rotate, Rotation::R90);
        assert_eq!(prim.style.scale, 5);
        match &prim.kind {
            PrimitiveKind::Text(t) => {
                assert_eq!(t.text, "hi");
                // extent (2*5, 5) rotated a quarter turn
                assert_eq!(t.corner, ivec2(10 - 5, 20 + 10));
            }
            other => panic!("expected text, got {other:?}"),
        }
        // the inline rotate/scale does not leak into the style state
        assert_eq!(scene.primitives[1].style.scale, 1);
        assert_eq!(scene.primitives[1].style.rotate, Rotation::R0);
    }

    #[test]
    fn image_records_decoded_size() {
        let scene = build(&["Scale 3", r#"Image 100 200 "photo.png""#]);
        match &scene.primitives[0].kind {
            PrimitiveKind::Image(img) => {
                assert_eq!(img.size, ivec2(4, 2));
                assert_eq!(img.corner, ivec2(100 + 12, 200 + 6));
                assert_eq!(img.path, "photo.png");
                assert!(img.pixels.is_some());
                assert!(img.texture.is_none());
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert!(scene.primitives[0].style.fill);
    }

    #[test]
    fn image_decode_failure_is_fatal() {
        let mut b = SceneBuilder::new(Box::new(FailingDecoder));
        let err = b.line(r#"Image 0 0 "missing.png""#).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Image(ImageError::Identify { .. })
        ));
    }

    #[test]
    fn numeric_garbage_parses_as_zero_then_clamps() {
        let scene = build(&["Circle bogus 7 nope"]);
        match &scene.primitives[0].kind {
            PrimitiveKind::Circle(c) => {
                assert_eq!(c.center, ivec2(0, 7));
                assert_eq!(c.radius, 1); // 0 clamped up to the radius floor
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }
}
