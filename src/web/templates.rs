// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTML templates for the result pages

use minijinja::Environment;

pub const BASE: &str = r#"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{% endblock %} - catscan</title>
    <style>
        :root {
            --bg-primary: #fdf8f3;
            --bg-card: #ffffff;
            --text-primary: #2d2a26;
            --text-secondary: #7a736b;
            --accent: #e07a2f;
            --danger: #d64545;
            --success: #2f9e6e;
            --border: #ece4da;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }
        .container { max-width: 960px; margin: 0 auto; padding: 20px; }
        nav {
            padding: 15px 20px;
            display: flex;
            gap: 30px;
            border-bottom: 1px solid var(--border);
        }
        nav .logo { font-size: 1.5em; font-weight: bold; color: var(--accent); text-decoration: none; }
        .card { background: var(--bg-card); border-radius: 12px; padding: 20px; margin-bottom: 20px; }
        .hero { width: 100%; max-height: 360px; object-fit: contain; border-radius: 12px; }
        .stats-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; margin: 20px 0; }
        .stat-card { background: var(--bg-card); border-radius: 12px; padding: 20px; text-align: center; }
        .stat-card .number { font-size: 2em; font-weight: bold; color: var(--accent); }
        .stat-card .label { color: var(--text-secondary); font-size: 0.9em; }
        .tabs { display: flex; gap: 10px; margin-bottom: 15px; flex-wrap: wrap; }
        .tabs a { padding: 6px 14px; border-radius: 20px; border: 1px solid var(--border); text-decoration: none; color: var(--text-primary); }
        .tabs a.active { background: var(--accent); color: white; border-color: var(--accent); }
        .abnormal { color: var(--danger); font-weight: bold; }
        .normal { color: var(--success); }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 10px; text-align: left; border-bottom: 1px solid var(--border); }
    </style>
</head>
<body>
    <nav><a href="/" class="logo">catscan</a></nav>
    <main class="container">
        {% block content %}{% endblock %}
    </main>
</body>
</html>"#;

pub const INDEX: &str = r#"{% extends "base.html" %}
{% block title %}Riwayat Scan{% endblock %}
{% block content %}
<h1>Riwayat Scan</h1>
<div class="card">
{% if rows %}
    <table>
        <tr><th>Scan</th><th>Status</th><th>Jenis</th><th>Abnormal</th><th>Tanggal</th></tr>
        {% for row in rows %}
        <tr>
            <td><a href="/scans/{{ row.id }}">#{{ row.id }}</a></td>
            <td>{{ row.status }}</td>
            <td>{{ row.scan_type or "-" }}</td>
            <td>{{ row.abnormal_count }}</td>
            <td>{{ row.created_at or "-" }}</td>
        </tr>
        {% endfor %}
    </table>
{% else %}
    <p>Belum ada scan</p>
{% endif %}
</div>
{% endblock %}"#;

pub const SCAN: &str = r#"{% extends "base.html" %}
{% block title %}Scan #{{ view.session_id }}{% endblock %}
{% block content %}
<h1>Hasil Scan #{{ view.session_id }}</h1>
<img class="hero" src="{{ view.hero_image }}" alt="Foto kucing">
<div class="stats-grid">
    <div class="stat-card"><div class="number">{{ view.summary.abnormal_count }}</div><div class="label">Area abnormal</div></div>
    <div class="stat-card"><div class="number">{{ view.summary.average_percent }}%</div><div class="label">Rata-rata keyakinan</div></div>
    <div class="stat-card"><div class="number">{{ view.status }}</div><div class="label">Status</div></div>
</div>
<div class="card">
    <h2>Catatan</h2>
    <p>{{ view.summary.remark }}</p>
</div>
{% if view.details %}
<div class="card">
    <div class="tabs">
    {% for d in view.details %}
        {% if d.area_name %}
        <a href="/scans/{{ view.session_id }}?area={{ d.area_name }}" class="{% if d.is_active %}active{% endif %}">{{ d.area_label }}</a>
        {% endif %}
    {% endfor %}
    </div>
    {% for d in view.details %}{% if d.is_active %}
    <h2>{{ d.area_label }}</h2>
    <p class="{% if d.is_abnormal %}abnormal{% else %}normal{% endif %}">{{ d.label or "-" }}
    {% if d.confidence_percent is not none %}({{ d.confidence_percent }}%){% endif %}</p>
    {% if d.description %}<p>{{ d.description }}</p>{% endif %}
    {% if d.advice %}<p><strong>Saran:</strong> {{ d.advice }}</p>{% endif %}
    {% if d.img_gradcam_url %}<img class="hero" src="{{ d.img_gradcam_url }}" alt="Grad-CAM">{% elif d.img_roi_url %}<img class="hero" src="{{ d.img_roi_url }}" alt="ROI">{% endif %}
    {% endif %}{% endfor %}
</div>
{% endif %}
{% endblock %}"#;

/// Template environment with every page registered
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE)?;
    env.add_template("index.html", INDEX)?;
    env.add_template("scan.html", SCAN)?;
    Ok(env)
}
