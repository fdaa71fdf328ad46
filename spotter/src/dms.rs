use std::fmt;
use terrain::dem::C;

/// Hundredths of an arcsecond per degree.
const CENTISECONDS_PER_DEGREE: u64 = 360_000;

/// A latitude or longitude in degrees, minutes and seconds.
///
/// Seconds are kept to hundredths, so `Display` never shows `60.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    /// Seconds × 100.
    pub centiseconds: u32,
    /// One of `N`, `S`, `E` or `W`.
    pub hemisphere: char,
}

impl Dms {
    pub fn latitude(degrees: C) -> Self {
        Self::new(degrees, if degrees < 0.0 { 'S' } else { 'N' })
    }

    pub fn longitude(degrees: C) -> Self {
        Self::new(degrees, if degrees < 0.0 { 'W' } else { 'E' })
    }

    pub fn seconds(&self) -> C {
        C::from(self.centiseconds) / 100.0
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn new(degrees: C, hemisphere: char) -> Self {
        let total = (degrees.abs() * CENTISECONDS_PER_DEGREE as C).round() as u64;
        let whole_degrees = total / CENTISECONDS_PER_DEGREE;
        let remainder = total % CENTISECONDS_PER_DEGREE;
        Self {
            degrees: whole_degrees as u32,
            minutes: (remainder / 6000) as u32,
            centiseconds: (remainder % 6000) as u32,
            hemisphere,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}° {}' {}.{:02}\" {}",
            self.degrees,
            self.minutes,
            self.centiseconds / 100,
            self.centiseconds % 100,
            self.hemisphere
        )
    }
}
