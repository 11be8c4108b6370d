use chrono::NaiveDate;
use ocs_fixedpoint::Points;

/// Format an OCC-style option symbol: `<root padded to 6><YYMMDD><C|P><strike*1000, 8 digits>`.
///
/// The root's padding width depends on the underlying's own symbol length —
/// weekly SPX options pad the root to 6 characters with spaces (`SPXW  `),
/// while a 3-character root like `XSP` pads to the same 6-character field
/// width with an extra space. Rather than special-case known roots, the
/// root is space-padded out to `root_width` and the caller supplies it,
/// since that width is a vendor/symbology detail, not a domain constant.
pub fn format_option_symbol(
    root: &str,
    root_width: usize,
    expiration: NaiveDate,
    is_call: bool,
    strike: Points,
) -> String {
    let padded_root = format!("{root:<root_width$}");
    let date_part = expiration.format("%y%m%d").to_string();
    let cp = if is_call { 'C' } else { 'P' };
    let strike_thousandths = (strike.raw() as i64) * 10; // raw is cents (1e-2); OCC wants 1e-3.
    format!("{padded_root}{date_part}{cp}{strike_thousandths:08}")
}
