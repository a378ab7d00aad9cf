//! A minimal web page editor: pages are plain text files named after
//! their title, viewed, edited and saved through three URL routes.

pub mod warn;
pub mod util;
pub mod config;
pub mod random_util;
pub mod easy_fs;
pub mod title;
pub mod page;
pub mod template;
pub mod http_request_method;
pub mod http_response_status_codes;
pub mod webutils;
pub mod acontext;
pub mod aresponse;
pub mod apachelog;
pub mod handler;
pub mod router;
pub mod webparts;
