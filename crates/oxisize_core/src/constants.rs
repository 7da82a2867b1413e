//! Constants for file extensions and resolution strategies.
//!
//! Parsing, resolution and tracing all read from these tables so that a file
//! the resolver can land on is also a file the parser knows how to read.

/// File extensions whose imports are followed while tracing
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// Extensions to try when resolving module imports (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "tsx", "mts", "cts", "json"];

/// Index file names to try when resolving directory imports
pub const INDEX_FILES: &[&str] = &[
    "index.js",
    "index.mjs",
    "index.cjs",
    "index.jsx",
    "index.ts",
    "index.tsx",
    "index.mts",
    "index.cts",
    "index.json",
];

/// package.json fields consulted (after `exports`) when none are configured
pub const DEFAULT_MAIN_FIELDS: &[&str] = &["module", "main"];

/// Node built-in modules. Imports of these never reach the filesystem.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

pub fn is_node_builtin(request: &str) -> bool {
    request.starts_with("node:") || NODE_BUILTINS.contains(&request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_extensions_cover_js_ts_extensions() {
        for ext in JS_TS_EXTENSIONS {
            assert!(
                RESOLVE_EXTENSIONS.contains(ext),
                "RESOLVE_EXTENSIONS is missing '{}' from JS_TS_EXTENSIONS",
                ext
            );
        }
    }

    #[test]
    fn test_index_files_uses_all_extensions() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_EXTENSIONS.len());
        for ext in RESOLVE_EXTENSIONS {
            let expected = format!("index.{}", ext);
            assert!(INDEX_FILES.contains(&expected.as_str()), "INDEX_FILES missing '{}'", expected);
        }
    }

    #[test]
    fn test_node_builtins() {
        assert!(is_node_builtin("fs"));
        assert!(is_node_builtin("node:path"));
        assert!(is_node_builtin("node:test"));
        assert!(!is_node_builtin("react"));
        assert!(!is_node_builtin("./fs"));
    }
}
