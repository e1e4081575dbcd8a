use serde::Serializer;

use crate::board::Severity;

/// Lower-case severity for use in markup class names and alert types.
pub(super) fn format_severity<S>(p: &Severity, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use Severity::*;
    let str = match p {
        Success => "success",
        Warning => "warning",
        Error => "error",
    };
    s.serialize_str(str)
}
