use crate::syntax::ast::Expr;
use crate::types::color::Color;
use crate::types::shape::named_font_size;
use crate::types::vec2::Vec2;

/// An evaluated expression. Identifiers stay symbolic: they name colors,
/// font sizes, triangle forms or elastic properties depending on context.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Color(Color),
    Point(Vec2),
    List(Vec<Value>),
    Ident(String),
}

impl Value {
    pub fn from_expr(expr: &Expr) -> Result<Value, String> {
        Ok(match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Str(s) => Value::Str(s.clone()),
            Expr::Ident(s) => Value::Ident(s.clone()),
            Expr::Color(hex) => Value::Color(Color::from_hex(hex)?),
            Expr::Coord(x, y) => {
                let (Expr::Number(x), Expr::Number(y)) = (x.as_ref(), y.as_ref()) else {
                    return Err(format!(
                        "coordinate components must be numbers, got ({}, {})",
                        x.describe(),
                        y.describe()
                    ));
                };
                Value::Point(Vec2::new(*x, *y))
            }
            Expr::Array(items) => Value::List(items.iter().map(Value::from_expr).collect::<Result<_, _>>()?),
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Color(_) => "color",
            Value::Point(_) => "coordinate",
            Value::List(_) => "array",
            Value::Ident(_) => "identifier",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Vec2> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Strings and bare identifiers both read as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// An array whose elements are all coordinates.
    pub fn as_points(&self) -> Option<Vec<Vec2>> {
        match self {
            Value::List(items) => items.iter().map(Value::as_point).collect(),
            _ => None,
        }
    }

    /// Hex literal, `"#RRGGBB"` string, or a palette name. Unknown names
    /// are errors.
    pub fn to_color(&self) -> Result<Color, String> {
        match self {
            Value::Color(c) => Ok(*c),
            Value::Str(s) | Value::Ident(s) => Color::parse(s),
            other => Err(format!("expected a color, got {}", other.type_name())),
        }
    }

    /// A positive number or a named size (`small`, `title`, ...).
    pub fn to_font_size(&self) -> Result<f64, String> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Str(s) | Value::Ident(s) => named_font_size(s).ok_or_else(|| format!("unknown font size `{s}`")),
            other => Err(format!("expected a font size, got {}", other.type_name())),
        }
    }
}
