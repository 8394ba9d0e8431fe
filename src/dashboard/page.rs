use crate::dashboard::{Dashboard, CANDIDATE_INPUT, GRAPH_OUTPUT};

const TITLE: &str = "Évolution du nombre de parrainages par candidat à la présidentielle";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const ABOUT_HTML: &str = r#"<h4>À propos</h4>
<ul>
  <li>Inspiration initiale : <a href="https://www.ted.com/talks/hans_rosling_new_insights_on_poverty">conférence de Hans Rosling</a></li>
  <li><a href="https://plotly.com/python/v3/gapminder-example/">Version Plotly</a></li>
  <li>Données : <a href="https://databank.worldbank.org/source/world-development-indicators">Banque mondiale</a></li>
  <li>(c) 2022 Olivier Ricou</li>
</ul>"#;

/// Full HTML page with the initial figure inlined for the default selection.
///
/// `base_path` is the prefix the dashboard router is mounted under (`/` at the root).
pub fn render_page(dashboard: &Dashboard, base_path: &str) -> serde_json::Result<String> {
    let selected = dashboard.default_selection();
    let figure = match selected {
        Some(candidate) => dashboard.update_graph(candidate),
        None => dashboard.update_graph(""),
    };
    let figure_json = script_safe(&serde_json::to_string(&figure)?);
    let update_url = script_safe(&serde_json::to_string(&format!(
        "{}/api/update",
        base_path.trim_end_matches('/')
    ))?);

    let mut options = String::new();
    for candidate in dashboard.candidates() {
        let checked = if Some(candidate.candidate.as_str()) == selected {
            " checked"
        } else {
            ""
        };
        let value = escape_html(&candidate.candidate);
        options.push_str(&format!(
            "<label style=\"display:block\"><input type=\"radio\" name=\"{CANDIDATE_INPUT}\" value=\"{value}\"{checked}> {value}</label>\n"
        ));
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>Parrainages</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body style="padding: 10px 50px 10px 50px; font-family: sans-serif">
<h3>{TITLE}</h3>
<div style="padding: 10px 50px; display: flex; justify-content: center">
  <div style="width: 80%"><div id="{GRAPH_OUTPUT}"></div></div>
  <div id="{CANDIDATE_INPUT}" style="margin-left: 15px; width: 15em; float: right">
    <br><br>
    <div>Candidat</div>
{options}    <br>
  </div>
</div>
<br>
{ABOUT_HTML}
<script>
const graph = document.getElementById("{GRAPH_OUTPUT}");
const initial = {figure_json};
Plotly.newPlot(graph, initial.data, initial.layout);
document.getElementById("{CANDIDATE_INPUT}").addEventListener("change", async (event) => {{
  const response = await fetch({update_url}, {{
    method: "POST",
    headers: {{ "content-type": "application/json" }},
    body: JSON.stringify({{ input: "{CANDIDATE_INPUT}", value: event.target.value }}),
  }});
  if (!response.ok) {{ return; }}
  const payload = await response.json();
  Plotly.react(graph, payload.data.figure.data, payload.data.figure.layout);
}});
</script>
</body>
</html>
"#
    ))
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// keeps inline JSON from closing the surrounding <script> element
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
