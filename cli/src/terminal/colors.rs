use colored::Color;

pub const PRIMARY: Color = Color::TrueColor {
    r: 94,
    g: 196,
    b: 255,
};
pub const ACCENT: Color = Color::TrueColor {
    r: 255,
    g: 184,
    b: 108,
};
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor {
    r: 214,
    g: 214,
    b: 214,
};
pub const SUCCESS: Color = Color::Green;
pub const FAILURE: Color = Color::Red;
pub const OUTPUT: Color = Color::TrueColor {
    r: 170,
    g: 170,
    b: 170,
};
