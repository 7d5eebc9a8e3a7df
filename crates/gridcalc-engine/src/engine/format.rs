/// Format a number for display.
///
/// Integral values print without a fractional part; everything else uses the
/// shortest representation that round-trips.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NUM!".to_string()
    } else if n.is_infinite() {
        "#DIV/0!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
