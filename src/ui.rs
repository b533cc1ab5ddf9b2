use crate::range::RangeId;
use crate::view::{ElementLayout, ViewSnapshot, STATUS_ELEMENT};

pub fn render_index(view: &ViewSnapshot, layout: ElementLayout, default_range: RangeId) -> String {
    let active = view.active.unwrap_or(default_range);

    let tabs: String = RangeId::ALL
        .iter()
        .map(|range| {
            let class = if *range == active { "tab active" } else { "tab" };
            format!(r##"<a href="#" id="{range}" class="{class}" role="tab">{range}</a>"##)
        })
        .collect();

    let panels: String = layout
        .panels()
        .into_iter()
        .map(|panel| render_panel(view, layout, panel, active))
        .collect();

    INDEX_HTML
        .replace("{{TABS}}", &tabs)
        .replace("{{PANELS}}", &panels)
        .replace("{{STATUS_ID}}", STATUS_ELEMENT)
        .replace("{{STATUS_CLASS}}", view.class(STATUS_ELEMENT).unwrap_or(""))
        .replace("{{STATUS}}", &escape_html(view.text(STATUS_ELEMENT)))
        .replace(
            "{{REFRESHED_AT}}",
            &escape_html(view.refreshed_at.as_deref().unwrap_or("never")),
        )
}

fn render_panel(
    view: &ViewSnapshot,
    layout: ElementLayout,
    panel: Option<RangeId>,
    active: RangeId,
) -> String {
    let ids = layout.ids(panel.unwrap_or(active));
    let (panel_id, hidden) = match panel {
        Some(range) => (format!("panel-{range}"), if range == active { "" } else { " hidden" }),
        None => ("panel-shared".to_string(), ""),
    };

    let svg = view
        .chart
        .as_ref()
        .filter(|chart| chart.canvas == ids.canvas)
        .map(|chart| chart.svg.as_str())
        .unwrap_or("");
    let loader = if view.loading.contains(&ids.container) {
        r#"<div class="loader"></div>"#
    } else {
        ""
    };

    format!(
        r#"<section class="range-panel" id="{panel_id}"{hidden}>
        <p class="summary">
          <span id="{status}" class="{status_class}"><span id="{gain}">{gain_text}</span><span id="{percent}">{percent_text}</span></span>
          <span class="timescale" id="{timescale}">{timescale_text}</span>
        </p>
        <div class="chart-card" id="{container}">
          <div class="chart-canvas" id="{canvas}">{svg}</div>{loader}
        </div>
      </section>"#,
        status = ids.status,
        status_class = view.class(&ids.status).unwrap_or(""),
        gain = ids.gain_loss,
        gain_text = escape_html(view.text(&ids.gain_loss)),
        percent = ids.percent_change,
        percent_text = escape_html(view.text(&ids.percent_change)),
        timescale = ids.timescale,
        timescale_text = escape_html(view.text(&ids.timescale)),
        container = ids.container,
        canvas = ids.canvas,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Portfolio Performance</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent-2: #2f4858;
      --gain: #2d7a4b;
      --loss: #c63b2b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
      font-size: 0.95rem;
    }

    #timescale-tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      width: fit-content;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .summary {
      margin: 0 0 12px;
      font-size: 1.5rem;
      font-weight: 600;
    }

    .summary .timescale {
      font-size: 1rem;
      font-weight: 500;
      color: #6b645d;
    }

    .text-success {
      color: var(--gain);
    }

    .text-danger {
      color: var(--loss);
    }

    .chart-card {
      position: relative;
      background: white;
      border-radius: 20px;
      padding: 16px;
      min-height: 292px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .chart-canvas svg {
      width: 100%;
      height: auto;
      display: block;
    }

    .loader {
      position: absolute;
      top: 50%;
      left: 50%;
      width: 36px;
      height: 36px;
      margin: -18px 0 0 -18px;
      border: 4px solid rgba(47, 72, 88, 0.15);
      border-top-color: var(--accent-2);
      border-radius: 50%;
      animation: spin 900ms linear infinite;
    }

    .status {
      font-size: 0.95rem;
      min-height: 1.2em;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Portfolio Performance</h1>
      <p class="subtitle">Gains and losses over the selected time range.</p>
    </header>

    <nav id="timescale-tabs" role="tablist">{{TABS}}</nav>

    {{PANELS}}

    <div id="{{STATUS_ID}}" class="status {{STATUS_CLASS}}">{{STATUS}}</div>
    <p class="hint">Last refreshed: <span id="refreshed-at">{{REFRESHED_AT}}</span></p>
  </main>

  <script>
    const tabs = Array.from(document.querySelectorAll('#timescale-tabs a'));
    const statusEl = document.getElementById('{{STATUS_ID}}');
    const refreshedEl = document.getElementById('refreshed-at');

    const setLoader = (container, on) => {
      const node = document.getElementById(container);
      if (!node) {
        return;
      }
      const pending = Math.max(0, Number(node.dataset.pending || 0) + (on ? 1 : -1));
      node.dataset.pending = String(pending);
      const loader = node.querySelector('.loader');
      if (pending > 0 && !loader) {
        const div = document.createElement('div');
        div.className = 'loader';
        node.appendChild(div);
      } else if (pending === 0 && loader) {
        node.removeChild(loader);
      }
    };

    const applyView = (view) => {
      Object.entries(view.elements).forEach(([id, element]) => {
        const node = document.getElementById(id);
        if (!node) {
          return;
        }
        if (element.text !== null) {
          node.textContent = element.text;
        }
        node.className = id === '{{STATUS_ID}}' ? `status ${element.class || ''}` : element.class || '';
      });

      document.querySelectorAll('.chart-canvas').forEach((canvas) => {
        canvas.innerHTML = '';
      });
      if (view.chart) {
        const canvas = document.getElementById(view.chart.canvas);
        if (canvas) {
          canvas.innerHTML = view.chart.svg;
        }
      }

      if (view.active) {
        tabs.forEach((tab) => tab.classList.toggle('active', tab.id === view.active));
        document.querySelectorAll('.range-panel').forEach((panel) => {
          panel.hidden = panel.id !== 'panel-shared' && panel.id !== `panel-${view.active}`;
        });
      }
      refreshedEl.textContent = view.refreshed_at || 'never';
    };

    const updateTab = async (tab) => {
      const container = document.getElementById(`${tab}-chart-container`) ? `${tab}-chart-container` : 'chart-container';
      setLoader(container, true);
      try {
        const res = await fetch(`/api/refresh?tab=${encodeURIComponent(tab)}`, { method: 'POST' });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        applyView(await res.json());
      } catch (err) {
        statusEl.textContent = err.message;
        statusEl.className = 'status text-danger';
      } finally {
        setLoader(container, false);
      }
    };

    tabs.forEach((tab) => {
      tab.addEventListener('click', (event) => {
        event.preventDefault();
        updateTab(tab.id);
      });
    });
  </script>
</body>
</html>
"#;
