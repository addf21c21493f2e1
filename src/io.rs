//! String escaping and the IEEE-754 hex-float codec (engine component C7).

use crate::error::{bail, Code, Error, Result};

/// Decodes `\DDD` escapes (exactly three decimal digits, naming a Unicode
/// code point) in a `STRING` literal's raw text. Called once at load time;
/// the decoded form is what every opcode subsequently observes.
pub fn unescape(raw: &str) -> Result<String> {
  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    let digits: String = chars.by_ref().take(3).collect();
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
      bail!(Code::Structural, "invalid \\DDD escape in string literal");
    }
    let code: u32 = digits.parse().map_err(|_| {
      Error::new(Code::Structural, "invalid \\DDD escape in string literal")
    })?;
    let ch = char::from_u32(code).ok_or_else(|| {
      Error::new(Code::Structural, format!("\\{digits} is not a valid code point"))
    })?;
    out.push(ch);
  }
  Ok(out)
}

/// Formats `v` as a C99 `%a`-style hex float, e.g. `0x1.8p+1`, the form
/// `WRITE` must emit for `FLOAT` values.
///
/// Always normalizes to a single leading hex digit (0 or 1) followed by
/// exactly 13 mantissa hex digits (52 bits), which keeps the encoded
/// mantissa an exact, losslessly round-trippable integer.
pub fn format_hex_float(v: f64) -> String {
  if v.is_nan() {
    return "nan".to_string();
  }
  if v.is_infinite() {
    return if v < 0.0 { "-inf".to_string() } else { "inf".to_string() };
  }

  let bits = v.to_bits();
  let sign = if bits >> 63 == 1 { "-" } else { "" };
  let raw_exp = ((bits >> 52) & 0x7ff) as i64;
  let mantissa = bits & 0x000f_ffff_ffff_ffff;

  if raw_exp == 0 && mantissa == 0 {
    return format!("{sign}0x0p+0");
  }

  let (lead, exp) = if raw_exp == 0 {
    // subnormal: normalize as 0x0.<mantissa>p-1022
    (0u64, -1022i64)
  } else {
    (1u64, raw_exp - 1023)
  };

  format!("{sign}0x{lead}.{mantissa:013x}p{exp:+}")
}

/// Parses the `0x1.8p+1` form back into an `f64`. Exact for any value this
/// crate itself produced via [`format_hex_float`]; accepts lowercase/
/// uppercase hex digits from external input as well.
pub fn parse_hex_float(s: &str) -> Result<f64> {
  let bad = || Error::new(Code::OperandType, format!("{s} is not a valid hex float"));

  let (sign, rest) = match s.strip_prefix('-') {
    Some(rest) => (-1.0, rest),
    None => (1.0, s.strip_prefix('+').unwrap_or(s)),
  };

  let rest = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")).ok_or_else(bad)?;
  let p_pos = rest.find(['p', 'P']).ok_or_else(bad)?;
  let (mantissa_part, exp_part) = rest.split_at(p_pos);
  let exp_part = &exp_part[1..];
  let exp: i64 = exp_part.parse().map_err(|_| bad())?;

  let (int_part, frac_part) = match mantissa_part.split_once('.') {
    Some((i, f)) => (i, f),
    None => (mantissa_part, ""),
  };

  let int_val = if int_part.is_empty() {
    0u64
  } else {
    u64::from_str_radix(int_part, 16).map_err(|_| bad())?
  };
  let frac_val = if frac_part.is_empty() {
    0u128
  } else {
    u128::from_str_radix(frac_part, 16).map_err(|_| bad())?
  };
  let frac_digits = frac_part.len() as u32;

  // value = sign * int_val.frac_val(hex) * 2^exp
  let scale = 16f64.powi(frac_digits as i32);
  let mantissa = int_val as f64 + (frac_val as f64) / scale;
  Ok(sign * mantissa * 2f64.powi(exp as i32))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unescape_decodes_known_escapes() {
    assert_eq!(unescape("a\\032b").unwrap(), "a b");
    assert_eq!(unescape("\\092").unwrap(), "\\");
  }

  #[test]
  fn unescape_rejects_malformed_escape() {
    assert!(unescape("\\1").is_err());
    assert!(unescape("\\1a2").is_err());
  }

  #[test]
  fn hex_float_round_trips() {
    for v in [0.0, 1.0, -1.0, 2.5, 0.1, 3.14159265358979, 1e10, -1e-10] {
      let formatted = format_hex_float(v);
      let parsed = parse_hex_float(&formatted).unwrap();
      assert_eq!(v.to_bits(), parsed.to_bits(), "round trip of {v} via {formatted}");
    }
  }

  #[test]
  fn hex_float_zero_is_positive_form() {
    assert_eq!(format_hex_float(0.0), "0x0p+0");
  }
}
