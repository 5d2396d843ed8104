/// Formats a second offset as the `HHhMMmSSs` string accepted by VOD URLs.
///
/// Every field is padded to two digits; the hour field grows past two digits
/// for offsets beyond 99 hours rather than wrapping.
pub fn format_timestamp(offset_seconds: u64) -> String {
    let hours = offset_seconds / 3600;
    let minutes = (offset_seconds % 3600) / 60;
    let seconds = offset_seconds % 60;

    format!("{hours:02}h{minutes:02}m{seconds:02}s")
}
