//! Every domain and path scope a cookie for the current location could have
//! been written under.

/// Progressive suffixes of `hostname`, longest first.
///
/// `a.b.example.com` yields `a.b.example.com`, `b.example.com`, `example.com`
/// and `com`. A dotted-quad IPv4 address yields only itself.
pub fn hostname_suffixes(hostname: &str) -> Vec<String> {
    if is_ipv4(hostname) {
        return vec![hostname.to_owned()];
    }
    let labels: Vec<&str> = hostname.split('.').collect();
    (0..labels.len()).map(|i| labels[i..].join(".")).collect()
}

/// Progressive prefixes of `pathname`, longest first, each followed by its
/// trailing-slash form.
///
/// `/a/b` yields `/a/b`, `/a/b/`, `/a`, `/a/` and `/`.
pub fn path_prefixes(pathname: &str) -> Vec<String> {
    let segments: Vec<&str> = pathname.split('/').collect();
    let mut prefixes = Vec::with_capacity(segments.len() * 2);
    for end in (1..=segments.len()).rev() {
        let prefix = segments[..end].join("/");
        if !prefix.is_empty() {
            prefixes.push(prefix.clone());
        }
        prefixes.push(prefix + "/");
    }
    prefixes
}

fn is_ipv4(hostname: &str) -> bool {
    let octets: Vec<&str> = hostname.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len()) && octet.bytes().all(|b| b.is_ascii_digit())
        })
}
