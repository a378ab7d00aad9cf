use std::env::VarError;

use anyhow::{Result, bail};


/// Get an env var as a String; decoding failures are reported as
/// errors. If the var is not set and no fallback was given, an error
/// is reported as well.
pub fn getenv_or(name: &str, fallbackvalue: Option<&str>) -> Result<String> {
    match getenv(name)? {
        Some(s) => Ok(s),
        None => match fallbackvalue {
            Some(v) => Ok(v.to_string()),
            None => bail!("{name:?} env var is missing and \
                           no default provided"),
        }
    }
}

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// An option given on the command line wins over the env var, which
/// wins over the fallback.
pub fn arg_or_getenv(arg: Option<String>, name: &str, fallbackvalue: Option<&str>)
                     -> Result<String>
{
    match arg {
        Some(v) => Ok(v),
        None => getenv_or(name, fallbackvalue)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names, since tests run in
    // parallel in the same process.

    #[test]
    fn t_getenv() -> Result<()> {
        std::env::remove_var("PAGEWIKI_T_GETENV_UNSET");
        assert_eq!(getenv("PAGEWIKI_T_GETENV_UNSET")?, None);
        assert_eq!(getenv_or("PAGEWIKI_T_GETENV_UNSET", Some("x"))?, "x");
        assert!(getenv_or("PAGEWIKI_T_GETENV_UNSET", None).is_err());
        std::env::set_var("PAGEWIKI_T_GETENV_SET", "y");
        assert_eq!(getenv_or("PAGEWIKI_T_GETENV_SET", Some("x"))?, "y");
        Ok(())
    }

    #[test]
    fn t_arg_or_getenv() -> Result<()> {
        std::env::set_var("PAGEWIKI_T_ARG", "env");
        assert_eq!(arg_or_getenv(Some("arg".into()), "PAGEWIKI_T_ARG", None)?, "arg");
        assert_eq!(arg_or_getenv(None, "PAGEWIKI_T_ARG", None)?, "env");
        Ok(())
    }
}
