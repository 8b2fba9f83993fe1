mod color;
mod core;

pub use self::core::*;
pub use color::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_serialization() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"x":0.0,"y":0.0,"width":1920.0,"height":1080.0}"#);
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn rect_accepts_integer_json() {
        let r: Rect = serde_json::from_str(r#"{"x":10,"y":20,"width":300,"height":400}"#).unwrap();
        assert_eq!(r, Rect::new(10.0, 20.0, 300.0, 400.0));
    }

    #[test]
    fn rect_validity() {
        assert!(Rect::new(-5.0, -5.0, 0.0, 0.0).is_valid());
        assert!(Rect::new(0.0, 0.0, 100.0, 50.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, -1.0, 50.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 100.0, -0.5).is_valid());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn color_from_hex_6() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 255));
    }

    #[test]
    fn color_from_hex_8() {
        let c = Color::from_hex("#ff880080").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 128));
    }

    #[test]
    fn color_from_hex_no_hash() {
        let c = Color::from_hex("ffffff").unwrap();
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn color_from_hex_invalid() {
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#abc").is_none());
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("#ffé0000").is_none());
    }
}
