//! Reads Well-Known Text.
//!
//! Accepts the 2D (and 3D, `x y z`) forms of every geometry type the engine
//! handles. Keywords are case-insensitive. `POINT EMPTY` reads as an empty
//! MultiPoint, since a Point always has a coordinate.
//!
//! ```
//! use topograph::geo::{Coordinate, Geometry, LineString};
//! use topograph::read::wkt;
//!
//! let g = wkt::parse("LINESTRING (0 0, 1.5 2)").unwrap();
//! assert_eq!(Geometry::LineString(LineString(vec![ Coordinate::new(0., 0.), Coordinate::new(1.5, 2.) ])), g);
//! ```

use std::error;
use std::fmt;
use regex::Regex;

use crate::geo::{Coordinate, Geometry, LineString, LinearRing, Point, Polygon};

#[derive(Debug, Clone, PartialEq)]
pub enum WktError {
    UnexpectedEnd,
    ParseError(String),
}

impl error::Error for WktError {
    fn description(&self) -> &str {
        match *self {
            WktError::UnexpectedEnd => { "unexpected end of input" },
            WktError::ParseError(ref description) => { description },
        }
    }
}

impl fmt::Display for WktError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WktError::UnexpectedEnd => { write!(f, "Parse error: unexpected end of input") },
            WktError::ParseError(ref description) => { write!(f, "Parse error: {}", description) },
        }
    }
}

lazy_static! {
    static ref TOKEN: Regex = Regex::new(
        r"^\s*(?:(?P<word>[A-Za-z]+)|(?P<number>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)|(?P<punct>[(),]))"
    ).unwrap();
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
}

fn tokenize(s: &str) -> Result<Vec<Token>, WktError> {
    let mut ret = vec![];
    let mut rest = s;

    while !rest.trim_start().is_empty() {
        let caps = match TOKEN.captures(rest) {
            Some(caps) => caps,
            None => return Err(WktError::ParseError(format!("unexpected text at `{}`", rest.trim_start()))),
        };

        if let Some(word) = caps.name("word") {
            ret.push(Token::Word(word.as_str().to_uppercase()));
        } else if let Some(number) = caps.name("number") {
            let n = number.as_str().parse::<f64>()
                .map_err(|_| WktError::ParseError(format!("invalid number `{}`", number.as_str())))?;
            ret.push(Token::Number(n));
        } else if let Some(punct) = caps.name("punct") {
            ret.push(match punct.as_str() {
                "(" => Token::LParen,
                ")" => Token::RParen,
                _ => Token::Comma,
            });
        }

        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }

    Ok(ret)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, WktError> {
        let token = self.tokens.get(self.pos).cloned().ok_or(WktError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), WktError> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(WktError::ParseError(format!("expected {:?}, got {:?}", expected, token)))
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        match self.next()? {
            Token::Number(n) => Ok(n),
            token => Err(WktError::ParseError(format!("expected a number, got {:?}", token))),
        }
    }

    /// True (and consumed) if the next token is `EMPTY`.
    fn empty(&mut self) -> bool {
        if self.peek() == Some(&Token::Word("EMPTY".to_string())) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parses "a, b, c)" after the opening paren has been consumed.
    fn list<T, F>(&mut self, mut item: F) -> Result<Vec<T>, WktError>
        where F: FnMut(&mut Parser) -> Result<T, WktError>
    {
        let mut ret = vec![ item(self)? ];
        loop {
            match self.next()? {
                Token::Comma => ret.push(item(self)?),
                Token::RParen => return Ok(ret),
                token => return Err(WktError::ParseError(format!("expected `,` or `)`, got {:?}", token))),
            }
        }
    }

    /// Parses "EMPTY" or "(a, b, c)".
    fn parenthesized_list<T, F>(&mut self, item: F) -> Result<Vec<T>, WktError>
        where F: FnMut(&mut Parser) -> Result<T, WktError>
    {
        if self.empty() {
            return Ok(vec![]);
        }
        self.expect(Token::LParen)?;
        self.list(item)
    }

    fn coordinate(&mut self) -> Result<Coordinate, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        match self.peek() {
            Some(&Token::Number(_)) => {
                let z = self.number()?;
                Ok(Coordinate::new_3d(x, y, z))
            }
            _ => Ok(Coordinate::new(x, y)),
        }
    }

    fn coordinates(&mut self) -> Result<Vec<Coordinate>, WktError> {
        self.parenthesized_list(|p| p.coordinate())
    }

    // A MultiPoint member may or may not have its own parentheses.
    fn multi_point_member(&mut self) -> Result<Point, WktError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let coord = self.coordinate()?;
            self.expect(Token::RParen)?;
            Ok(Point(coord))
        } else {
            Ok(Point(self.coordinate()?))
        }
    }

    fn polygon(&mut self) -> Result<Polygon, WktError> {
        let mut rings = self.parenthesized_list(|p| p.coordinates())?.into_iter().map(LinearRing);
        let exterior = rings.next().unwrap_or(LinearRing(vec![]));
        Ok(Polygon::new(exterior, rings.collect()))
    }

    fn geometry(&mut self) -> Result<Geometry, WktError> {
        let keyword = match self.next()? {
            Token::Word(w) => w,
            token => return Err(WktError::ParseError(format!("expected a geometry type, got {:?}", token))),
        };

        match keyword.as_str() {
            "POINT" => {
                let mut coords = self.coordinates()?;
                match coords.len() {
                    0 => Ok(Geometry::MultiPoint(vec![])),
                    1 => Ok(Geometry::Point(Point(coords.remove(0)))),
                    n => Err(WktError::ParseError(format!("POINT with {} coordinates", n))),
                }
            }
            "LINESTRING" => Ok(Geometry::LineString(LineString(self.coordinates()?))),
            "LINEARRING" => Ok(Geometry::LinearRing(LinearRing(self.coordinates()?))),
            "POLYGON" => Ok(Geometry::Polygon(self.polygon()?)),
            "MULTIPOINT" => Ok(Geometry::MultiPoint(self.parenthesized_list(|p| p.multi_point_member())?)),
            "MULTILINESTRING" => {
                let lines = self.parenthesized_list(|p| p.coordinates())?;
                Ok(Geometry::MultiLineString(lines.into_iter().map(LineString).collect()))
            }
            "MULTIPOLYGON" => Ok(Geometry::MultiPolygon(self.parenthesized_list(|p| p.polygon())?)),
            "GEOMETRYCOLLECTION" => Ok(Geometry::GeometryCollection(self.parenthesized_list(|p| p.geometry())?)),
            _ => Err(WktError::ParseError(format!("unknown geometry type `{}`", keyword))),
        }
    }
}

/// Parses one WKT geometry. Anything after it is an error.
pub fn parse(s: &str) -> Result<Geometry, WktError> {
    let mut parser = Parser { tokens: tokenize(s)?, pos: 0 };
    let geometry = parser.geometry()?;
    match parser.peek() {
        None => Ok(geometry),
        Some(token) => Err(WktError::ParseError(format!("unexpected {:?} after geometry", token))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn point() {
        assert_eq!(Geometry::Point(Point(c(1.0, -2.5))), parse("POINT (1 -2.5)").unwrap());
        assert_eq!(Geometry::Point(Point(c(1.0, 2.0))), parse("  point(1 2)  ").unwrap());
        assert_eq!(Geometry::MultiPoint(vec![]), parse("POINT EMPTY").unwrap());
    }

    #[test]
    fn point_3d() {
        match parse("POINT (1 2 3)").unwrap() {
            Geometry::Point(Point(coord)) => assert_eq!(3.0, coord.z),
            g => panic!("expected a point, got {}", g),
        }
    }

    #[test]
    fn polygon_with_hole() {
        let g = parse("POLYGON ((0 0, 0 9, 9 9, 9 0, 0 0), (3 3, 6 3, 6 6, 3 6, 3 3))").unwrap();
        match g {
            Geometry::Polygon(ref p) => {
                assert_eq!(5, p.exterior.0.len());
                assert_eq!(1, p.interiors.len());
                assert_eq!(c(6.0, 3.0), p.interiors[0].0[1]);
            }
            _ => panic!("expected a polygon, got {}", g),
        }
    }

    #[test]
    fn multi_point_both_forms() {
        let expected = Geometry::MultiPoint(vec![ Point(c(1.0, 1.0)), Point(c(2.0, 2.0)) ]);
        assert_eq!(expected, parse("MULTIPOINT ((1 1), (2 2))").unwrap());
        assert_eq!(expected, parse("MULTIPOINT (1 1, 2 2)").unwrap());
    }

    #[test]
    fn collections() {
        let g = parse("GEOMETRYCOLLECTION (POINT (1 1), MULTIPOLYGON (((0 0, 0 1, 1 1, 0 0)), EMPTY), MULTILINESTRING EMPTY)").unwrap();
        assert_eq!(3, g.num_geometries());
        assert_eq!(Geometry::GeometryCollection(vec![]), parse("GEOMETRYCOLLECTION EMPTY").unwrap());
    }

    #[test]
    fn numbers() {
        assert_eq!(Geometry::Point(Point(c(0.5, -1e3))), parse("POINT (.5 -1E3)").unwrap());
        assert_eq!(Geometry::Point(Point(c(2.0, 3.0))), parse("POINT (+2. 3)").unwrap());
    }

    #[test]
    fn display_round_trip() {
        let text = "MULTIPOLYGON (((0 0, 0 2, 2 2, 2 0, 0 0)), ((5 5, 5 6, 6 6, 5 5)))";
        assert_eq!(text, format!("{}", parse(text).unwrap()));
    }

    #[test]
    fn errors() {
        assert_eq!(Err(WktError::UnexpectedEnd), parse("LINESTRING (0 0, 1"));
        assert!(parse("CIRCLE (0 0)").is_err());
        assert!(parse("POINT (0 0) POINT (1 1)").is_err());
        assert!(parse("POINT (0 0; 1 1)").is_err());
        assert!(parse("POINT (0 0, 1 1)").is_err());

        let err = parse("LINESTRING (0 0 1 1)").unwrap_err();
        assert_eq!("Parse error: expected `,` or `)`, got Number(1.0)", format!("{}", err));
    }
}
