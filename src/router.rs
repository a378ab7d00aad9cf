//! Map request paths to handlers by pattern. A pattern ending in a
//! slash, like `/view/`, matches every path below it; any other
//! pattern only matches that exact path. The longest matching pattern
//! wins.

use std::fmt::Debug;

use anyhow::{Result, bail};
use kstring::KString;


#[derive(Debug)]
pub struct PrefixRouter<T> {
    // Kept sorted by descending length so the first match is the
    // longest one.
    entries: Vec<(KString, T)>,
}

impl<T> PrefixRouter<T> {
    pub fn new() -> PrefixRouter<T> {
        PrefixRouter { entries: Vec::new() }
    }

    /// Using path *strings*, and chaining.
    pub fn add(&mut self, pattern: &str, val: T) -> Result<&mut Self>
    where T: Debug
    {
        if !pattern.starts_with('/') {
            bail!("pattern must start with a slash: {:?}", pattern)
        }
        if let Some((_, old)) = self.entries.iter().find(|(p, _)| p.as_str() == pattern) {
            bail!("already contained an entry for {:?}: {:?}",
                  pattern, old)
        }
        let i = self.entries.iter()
            .position(|(p, _)| p.len() < pattern.len())
            .unwrap_or(self.entries.len());
        self.entries.insert(i, (KString::from_ref(pattern), val));
        Ok(self)
    }

    /// Returns the value for the best matching pattern and the rest
    /// of the path after the pattern (empty for exact matches).
    pub fn get<'s, 'p>(&'s self, path: &'p str) -> Option<(&'s T, &'p str)> {
        self.entries.iter().find_map(|(pattern, val)| {
            if pattern.ends_with('/') {
                path.strip_prefix(pattern.as_str()).map(|rest| (val, rest))
            } else if path == pattern.as_str() {
                Some((val, ""))
            } else {
                None
            }
        })
    }
}

impl<T> Default for PrefixRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_add() -> Result<()> {
        let mut r = PrefixRouter::new();
        r
            .add("/view/", 1)?
            .add("/index", 2)?;
        assert_eq!(r.add("/view/", 3).err().unwrap().to_string(),
                   "already contained an entry for \"/view/\": 1");
        assert!(r.add("edit/", 4).is_err());
        Ok(())
    }

    #[test]
    fn t_get() -> Result<()> {
        let mut r = PrefixRouter::new();
        r
            .add("/", 0)?
            .add("/view/", 1)?
            .add("/edit/", 2)?
            .add("/index", 3)?
            .add("/view/special/", 4)?;
        assert_eq!(r.get("/view/Foo"), Some((&1, "Foo")));
        assert_eq!(r.get("/view/"), Some((&1, "")));
        assert_eq!(r.get("/view/a/b"), Some((&1, "a/b")));
        assert_eq!(r.get("/view/special/x"), Some((&4, "x")));
        assert_eq!(r.get("/edit/Foo"), Some((&2, "Foo")));
        assert_eq!(r.get("/index"), Some((&3, "")));
        // "/index" is exact, thus these fall through to "/"
        assert_eq!(r.get("/index/x"), Some((&0, "index/x")));
        assert_eq!(r.get("/view"), Some((&0, "view")));
        assert_eq!(r.get("/"), Some((&0, "")));
        assert_eq!(r.get(""), None);
        Ok(())
    }

    #[test]
    fn t_no_fallback() -> Result<()> {
        let mut r = PrefixRouter::new();
        r.add("/save/", ())?;
        assert_eq!(r.get("/save/A"), Some((&(), "A")));
        assert_eq!(r.get("/saveA"), None);
        assert_eq!(r.get("/other"), None);
        Ok(())
    }
}
