use anyhow::Result;

use crate::db::models::ChartPoint;

/// Render the `/grafica/{device_id}` page: a Chart.js line chart (loaded
/// from CDN) with temperatura, humedad and consumo_w over time. Power is
/// plotted on a secondary axis. Missing measurements stay JSON `null` so
/// Chart.js draws gaps instead of zeroes.
///
/// `points` must already be in chronological order (oldest first).
pub fn render_chart_page(device_id: &str, points: &[ChartPoint]) -> Result<String> {
    let labels: Vec<String> = points
        .iter()
        .map(|p| p.timestamp_lectura.to_rfc3339())
        .collect();
    let temperatura: Vec<Option<f64>> = points.iter().map(|p| p.temperatura).collect();
    let humedad: Vec<Option<f64>> = points.iter().map(|p| p.humedad).collect();
    let consumo: Vec<Option<f64>> = points.iter().map(|p| p.consumo_w).collect();

    let labels = serde_json::to_string(&labels)?;
    let temperatura = serde_json::to_string(&temperatura)?;
    let humedad = serde_json::to_string(&humedad)?;
    let consumo = serde_json::to_string(&consumo)?;
    let device = escape_html(device_id);

    Ok(format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>Grafica {device}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>body {{ font-family: system-ui, sans-serif; padding: 20px; }}</style>
  </head>
  <body>
    <h2>Dispositivo: {device}</h2>
    <canvas id="chart" width="900" height="300"></canvas>
    <script>
      const labels = {labels};
      const temp = {temperatura};
      const hum = {humedad};
      const cons = {consumo};

      const ctx = document.getElementById('chart').getContext('2d');
      const chart = new Chart(ctx, {{
        type: 'line',
        data: {{
          labels: labels,
          datasets: [
            {{ label: 'Temperatura (°C)', data: temp, borderColor: 'rgb(255,99,132)', tension: 0.2 }},
            {{ label: 'Humedad (%)', data: hum, borderColor: 'rgb(54,162,235)', tension: 0.2 }},
            {{ label: 'Consumo (W)', data: cons, borderColor: 'rgb(255,205,86)', tension: 0.2, yAxisID: 'y1' }},
          ]
        }},
        options: {{
          interaction: {{ mode: 'index', intersect: false }},
          scales: {{
            y: {{ type: 'linear', position: 'left' }},
            y1: {{ type: 'linear', position: 'right', grid: {{ drawOnChartArea: false }} }}
          }}
        }}
      }});
    </script>
  </body>
</html>
"#
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
