/// Joins `prefix` and `path` into an object key using slash-separated
/// path semantics: empty elements are skipped, repeated separators collapse,
/// `.` segments vanish and `..` is resolved lexically. An empty join yields
/// an empty key.
pub fn join_key(prefix: &str, path: &str) -> String {
    let joined = match (prefix.is_empty(), path.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}/{}", prefix, path),
    };
    clean(&joined)
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            segment => segments.push(segment),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
