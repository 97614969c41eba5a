//! External symbol encoders: 1D barcodes (barcoders) and QR (qrcode).
//!
//! The compositor only needs barcode bars (to keep layer output
//! self-contained and deterministic); QR modules are produced by renderers
//! from the payload string.

use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use qrcode::{Color, EcLevel, QrCode};

use super::layer::Bar;
use crate::design::BarcodeKind;
use crate::error::InsigniaError;

/// Encode `data` to a module sequence (1 = bar, 0 = space).
///
/// Code 39 and Code 93 only carry upper-case data, so input is upper-cased
/// for them. Code 128 uses character set B.
pub fn encode_barcode(kind: BarcodeKind, data: &str) -> Result<Vec<u8>, InsigniaError> {
    let symbol_err = |e: barcoders::error::Error| {
        InsigniaError::Symbol(format!("{:?} rejected {:?}: {:?}", kind, data, e))
    };
    let modules = match kind {
        BarcodeKind::Code128 => Code128::new(format!("\u{0181}{}", data))
            .map_err(symbol_err)?
            .encode(),
        BarcodeKind::Code39 => Code39::new(data.to_uppercase()).map_err(symbol_err)?.encode(),
        BarcodeKind::Code93 => Code93::new(data.to_uppercase()).map_err(symbol_err)?.encode(),
    };
    Ok(modules)
}

/// Merge runs of dark modules into bars scaled to `width`.
pub fn bars(modules: &[u8], width: f32) -> Vec<Bar> {
    if modules.is_empty() {
        return Vec::new();
    }
    let module = width / modules.len() as f32;
    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, m) in modules.iter().enumerate() {
        match (*m == 1, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                out.push(Bar {
                    x: start as f32 * module,
                    width: (i - start) as f32 * module,
                });
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        out.push(Bar {
            x: start as f32 * module,
            width: (modules.len() - start) as f32 * module,
        });
    }
    out
}

/// QR module grid for `payload`: (side length, row-major dark flags).
pub fn qr_modules(payload: &str) -> Result<(usize, Vec<bool>), InsigniaError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| InsigniaError::Symbol(format!("QR encoding failed: {:?}", e)))?;
    let side = code.width();
    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == Color::Dark)
        .collect();
    Ok((side, dark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_merge_runs() {
        let b = bars(&[1, 1, 0, 1, 0, 0, 1, 1, 1, 0], 10.0);
        assert_eq!(
            b,
            vec![
                Bar { x: 0.0, width: 2.0 },
                Bar { x: 3.0, width: 1.0 },
                Bar { x: 6.0, width: 3.0 },
            ]
        );
    }

    #[test]
    fn test_bars_trailing_run() {
        let b = bars(&[0, 1, 1], 3.0);
        assert_eq!(b, vec![Bar { x: 1.0, width: 2.0 }]);
        assert!(bars(&[], 10.0).is_empty());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = encode_barcode(BarcodeKind::Code128, "CERT-2026-0042").unwrap();
        let b = encode_barcode(BarcodeKind::Code128, "CERT-2026-0042").unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|m| *m <= 1));
    }

    #[test]
    fn test_code39_uppercases() {
        let lower = encode_barcode(BarcodeKind::Code39, "abc-123").unwrap();
        let upper = encode_barcode(BarcodeKind::Code39, "ABC-123").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_qr_modules_square() {
        let (side, dark) = qr_modules("https://verify.example.org/verify/CERT-1").unwrap();
        assert_eq!(dark.len(), side * side);
        assert!(dark.iter().any(|d| *d));
    }
}
