//! Printing diagnostics to stderr. Request logging proper goes through
//! `apachelog`; this is for the things that don't belong to a request.

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "W: ");
        let _ = write!(&mut outp, $formatstr $(,$arg)*);
        let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
        let _ = outp.flush();
    } }
}

/// Like `warn!` but for informational messages, without the source
/// location.
#[macro_export]
macro_rules! info {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "I: ");
        let _ = writeln!(&mut outp, $formatstr $(,$arg)*);
        let _ = outp.flush();
    } }
}
