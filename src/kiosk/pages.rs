//! Response builders for the kiosk's generated documents.

use crate::config::{BareConfig, ToolkitConfig};
use crate::http::response::StaticResponse;
use crate::kiosk::{BUNDLE_PATH, CONFIG_PATH, HANDLER_PATH, SW_PATH};

/// The kiosk HTML shell: address bar, "Go" button and the proxied content frame.
///
/// The bundle script tag precedes the config tag because the config script
/// references `Ultraviolet.codec`, which the bundle defines.
pub fn kiosk_page(toolkit: &ToolkitConfig) -> StaticResponse {
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Ultraviolet Single-File Kiosk</title>
    <style>
        body {{ margin: 0; background: #111; color: white; font-family: sans-serif; overflow: hidden; display: flex; flex-direction: column; height: 100vh; }}
        .omnibox {{ display: flex; padding: 10px; background: #222; border-bottom: 1px solid #444; }}
        input {{ flex: 1; padding: 8px; border-radius: 5px; border: none; background: #333; color: white; }}
        button {{ margin-left: 10px; padding: 8px 15px; border: none; background: #007bff; color: white; cursor: pointer; border-radius: 5px; }}
        iframe {{ flex: 1; border: none; width: 100%; background: #fff; }}
    </style>
    <script src="{bundle}" defer></script>
    <script src="{config}" defer></script>
</head>
<body>
    <div class="omnibox">
        <input id="url" type="text" placeholder="Enter URL (e.g. tiktok.com)" />
        <button id="go">Go</button>
    </div>
    <iframe id="frame"></iframe>
    <script>
        const input = document.getElementById('url');
        const frame = document.getElementById('frame');

        async function registerSW() {{
            if (!navigator.serviceWorker) throw new Error("Your browser doesn't support Service Workers");
            await navigator.serviceWorker.register('{sw}', {{ scope: '{prefix}' }});
        }}

        async function go() {{
            let url = input.value.trim();
            if (!url) return;
            if (!url.startsWith('http')) url = 'https://' + url;

            await registerSW();

            frame.src = '{prefix}' + __uv$config.encodeUrl(url);
        }}

        document.getElementById('go').onclick = go;
        input.onkeydown = (e) => {{ if (e.key === 'Enter') go(); }};
    </script>
</body>
</html>
"#,
        bundle = BUNDLE_PATH,
        config = CONFIG_PATH,
        sw = SW_PATH,
        prefix = toolkit.service_prefix,
    );

    StaticResponse::html(body)
}

/// The `self.__uv$config` declaration shared by the page and the service worker.
pub fn uv_config_script(toolkit: &ToolkitConfig, bare: &BareConfig) -> StaticResponse {
    let body = format!(
        r#"/* UV Configuration */
self.__uv$config = {{
    prefix: '{prefix}',
    bare: '{bare}',
    encodeUrl: Ultraviolet.codec.xor.encode,
    decodeUrl: Ultraviolet.codec.xor.decode,
    handler: '{handler}',
    bundle: '{bundle}',
    config: '{config}',
    sw: '{sw}',
}};
"#,
        prefix = toolkit.service_prefix,
        bare = bare.path_prefix,
        handler = HANDLER_PATH,
        bundle = BUNDLE_PATH,
        config = CONFIG_PATH,
        sw = SW_PATH,
    );

    StaticResponse::javascript(body)
}

/// The service worker. Imports run in dependency order: bundle, handler, config.
pub fn service_worker_script() -> StaticResponse {
    let body = format!(
        r#"importScripts('{bundle}');
importScripts('{handler}');
importScripts('{config}');

const uv = new UVServiceWorker();

self.addEventListener('fetch', event => {{
    event.respondWith(
        (async () => {{
            if (uv.route(event)) {{
                return await uv.fetch(event);
            }}
            return await fetch(event.request);
        }})()
    );
}});
"#,
        bundle = BUNDLE_PATH,
        handler = HANDLER_PATH,
        config = CONFIG_PATH,
    );

    StaticResponse::javascript(body)
}
