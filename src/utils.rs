use std::time::Duration;

pub fn format_duration(value: &Duration) -> String {
    if value.as_secs() < 60 {
        format!("{}.{:0>3}s", value.as_secs(), value.subsec_millis())
    } else if value.as_secs() < 60 * 60 {
        format!(
            "{}m {:0>2}.{:0>2}s",
            value.as_secs() / 60,
            value.as_secs() % 60,
            value.subsec_millis() / 10
        )
    } else {
        format!(
            "{}h {:0>2}m {:0>2}s",
            value.as_secs() / (60 * 60),
            (value.as_secs() / 60) % 60,
            value.as_secs() % 60
        )
    }
}

const SIZE_UNIT: u64 = 1024;
const SIZE_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count with binary prefixes, e.g. `1.5 KiB`.
pub fn format_file_size(size: u64) -> String {
    if size < SIZE_UNIT {
        return format!("{} B", size);
    }

    let mut divisor = SIZE_UNIT;
    let mut exponent = 0;
    let mut remaining = size / SIZE_UNIT;
    while remaining >= SIZE_UNIT {
        divisor *= SIZE_UNIT;
        exponent += 1;
        remaining /= SIZE_UNIT;
    }

    format!(
        "{:.1} {}iB",
        size as f64 / divisor as f64,
        SIZE_PREFIXES[exponent]
    )
}
