/// STL loader producing World source geometry
///
/// Both encodings are supported. Facet normals stored in the file are
/// skipped: collision planes are always recomputed from the vertices.
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::mesh::{Face, Mesh};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }
    let (body, expected) = binary_header(data).map_err(|_| StlError::TooShort(data.len()))?;
    let expected = expected as usize;

    let found = body.len() / FACET_LEN;
    if found < expected {
        return Err(StlError::Truncated { expected, found });
    }

    let (_, faces) =
        count(binary_facet, expected)(body).map_err(|_| StlError::Truncated { expected, found })?;
    Ok(Mesh { faces })
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Face> {
    let (input, _normal) = take(12usize)(input)?;
    let (input, (a, b, c)) = tuple((le_point, le_point, le_point))(input)?;
    let (input, _attributes) = take(2usize)(input)?;
    Ok((input, [a, b, c]))
}

fn le_point(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match ascii_solid(input) {
        Ok((_, faces)) => Ok(Mesh { faces }),
        Err(e) => Err(StlError::Ascii(e.to_string())),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Face>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, faces) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, faces))
}

fn ascii_facet(input: &str) -> IResult<&str, Face> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_point(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = preceded(preceded(multispace0, tag("vertex")), ascii_point)(input)?;
    let (input, b) = preceded(preceded(multispace0, tag("vertex")), ascii_point)(input)?;
    let (input, c) = preceded(preceded(multispace0, tag("vertex")), ascii_point)(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_point(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary files may also start with "solid", so fall back on failure.
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }
    parse_binary_stl(data)
}
