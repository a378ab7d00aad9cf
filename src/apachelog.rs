//! Write HTTP access log files in the Combined Log Format (extended
//! Common Log Format) for access logs (Apache style), as per
//! <https://httpd.apache.org/docs/2.4/logs.html>.

use std::mem::swap;
use std::panic;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, Instant};
use std::io::{stderr, BufWriter, Write};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rouille::ResponseBody;

use crate::acontext::AContext;
use crate::aresponse::AResponse;
use crate::easy_fs::open_log_output;
use crate::http_response_status_codes::HttpResponseStatusCode;
use crate::warn;
use crate::webutils::errorpage_from_status;


// "06/Dec/2023:02:02:47 +0000"
pub fn write_time(
    outp: &mut impl Write,
    time: SystemTime
) -> Result<()> {
    let dt: DateTime<Utc> = DateTime::from(time);
    write!(outp, "{}", dt.format("%d/%b/%Y:%H:%M:%S +0000"))?;
    Ok(())
}

/// Get at the response body length; rouille keeps it private, thus
/// temporarily take the body apart and put it back together.
fn response_len(aresponse: &mut AResponse) -> Option<usize> {
    let mut responsebody = ResponseBody::empty();
    swap(&mut responsebody, &mut aresponse.response.data);
    let (data, length) = responsebody.into_reader_and_size();
    responsebody =
        if let Some(len) = length {
            ResponseBody::from_reader_and_size(data, len)
        } else {
            ResponseBody::from_reader(data)
        };
    swap(&mut responsebody, &mut aresponse.response.data);
    length
}

// 18.134.151.89 - - [06/Dec/2023:02:02:47 +0000] "GET /view/Foo HTTP/1.1" 200 447 "-" "curl/8.5.0"
// We also add duration at the end, and leave out the protocol version.

/// Write to access.log
pub fn write_combined(
    outp: &mut impl Write,
    context: &AContext,
    duration: Duration,
    aresponse: &mut AResponse,
) -> Result<()> {
    // Write the time when the log entry is made, not when the
    // request started
    let now = SystemTime::now();
    write!(outp, "{} - - [", context.client_ip())?;
    write_time(outp, now)?;
    let len = response_len(aresponse);
    writeln!(outp, "] {:?} {} {} {:?} {:?} {duration:?}",
             context.request_line(),
             aresponse.response.status_code,
             len.unwrap_or(0),
             context.referer().unwrap_or("-"),
             context.user_agent().unwrap_or("-")
    )?;
    outp.flush()?;
    Ok(())
}

/// Write to error.log
pub fn write_error(
    outp: &mut impl Write,
    context: &AContext,
    duration: Duration,
    err: &anyhow::Error,
) -> Result<()> {
    let now = SystemTime::now();
    write!(outp, "[")?;
    write_time(outp, now)?;
    writeln!(outp, "] [error] [client {}] {:?} {duration:?}: {err:#}",
             context.client_ip(),
             context.request_line())?;
    outp.flush()?;
    Ok(())
}

/// Panic log to stderr.
fn write_panic_stderr(
    context: &AContext,
    duration: Duration
) {
    let mut outp = BufWriter::new(stderr().lock());
    // stderr is expected to be fed to a service like daemontools,
    // hence no timestamps.
    let _ = writeln!(&mut outp, "[panic] handling {:?} after {duration:?}",
                     context.request_line());
    let _ = outp.flush();
}


/// The log files to write to: every response goes to the access log,
/// handler errors additionally to the error log. Should do buffering
/// (i.e. be BufWriter), the code calls flush once per entry.
pub struct Logs {
    pub access_log: Box<dyn Write + Send + Sync>,
    pub error_log: Box<dyn Write + Send + Sync>,
}

impl Logs {
    /// `access.log` and `error.log` in `logdir`, appending.
    pub fn open_in_dir(logdir: &Path) -> Result<Arc<Mutex<Logs>>> {
        Ok(Arc::new(Mutex::new(Logs {
            access_log: open_log_output(logdir.join("access.log"))?,
            error_log: open_log_output(logdir.join("error.log"))?,
        })))
    }

    /// Both logs going to stderr.
    pub fn stderr() -> Arc<Mutex<Logs>> {
        Arc::new(Mutex::new(Logs {
            access_log: Box::new(stderr()),
            error_log: Box::new(stderr()),
        }))
    }
}


/// Run `handler`, timing it and catching its panics, and log the
/// outcome. A handler `Err` becomes a 500 error page.
pub fn log_combined<F>(
    context: &AContext,
    logs: &Mutex<Logs>,
    handler: F
) -> AResponse
where
    F: FnOnce() -> Result<AResponse>,
{
    let start_instant = Instant::now();

    // Call the handler and catch panics.
    // Note that we always resume unwinding afterwards.
    let result = panic::catch_unwind(panic::AssertUnwindSafe(handler));
    let elapsed = start_instant.elapsed();

    match result {
        Ok(result) => {
            let mut response = match result {
                Ok(response) => response,
                Err(err) => {
                    // XX btw expects that the requester accepts HTML.
                    let mut response: AResponse = errorpage_from_status(
                        HttpResponseStatusCode::InternalServerError500).into();
                    response.error = Some(err);
                    response
                }
            };
            let mut logs = logs.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(err) = &response.error {
                if let Err(e) = write_error(&mut logs.error_log, context, elapsed, err) {
                    warn!("could not write to error log: {e:#}")
                }
            }
            if let Err(e) = write_combined(&mut logs.access_log, context, elapsed,
                                           &mut response) {
                warn!("could not write to access log: {e:#}")
            }
            response
        }
        Err(payload) => {
            write_panic_stderr(context, elapsed);
            // The panic handler will print the payload contents
            panic::resume_unwind(payload);
        }
    }
}
