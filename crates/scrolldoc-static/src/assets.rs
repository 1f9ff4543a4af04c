//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the browser runtime that drives section navigation.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Sections are stacked in <main>; position classes drive the slide transition.
// The transform duration should stay at or under the navigation settle delay.
const DEFAULT_CSS: &str = r#"/* scrolldoc section layout */

:root {
  --sidebar-width: 240px;
  --content-max-width: 820px;
  --transition: 500ms cubic-bezier(0.4, 0, 0.2, 1);
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --primary-foreground: #ffffff;
}

* {
  box-sizing: border-box;
}

html,
body {
  margin: 0;
  height: 100%;
  overflow: hidden;
}

body {
  display: flex;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

/* Sidebar */
.sidebar {
  flex: 0 0 var(--sidebar-width);
  height: 100vh;
  padding: 1.5rem 1rem;
  background: var(--muted);
  border-right: 1px solid var(--border);
  overflow-y: auto;
}

.sidebar-title {
  font-weight: 700;
  font-size: 1.25rem;
  margin-bottom: 1.5rem;
  padding: 0 0.75rem;
}

.sidebar-nav {
  display: flex;
  flex-direction: column;
  gap: 0.25rem;
}

.nav-btn {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  width: 100%;
  padding: 0.5rem 0.75rem;
  border: none;
  border-radius: 0.375rem;
  background: none;
  color: var(--muted-foreground);
  font: inherit;
  text-align: left;
  text-decoration: none;
  cursor: pointer;
  transition: background 0.15s, color 0.15s;
}

.nav-btn:hover {
  background: var(--border);
  color: var(--foreground);
}

.nav-btn.active {
  background: var(--primary);
  color: var(--primary-foreground);
}

/* Sections */
main {
  position: relative;
  flex: 1;
  height: 100vh;
  overflow: hidden;
}

.content-section {
  position: absolute;
  inset: 0;
  overflow-y: auto;
  opacity: 0;
  transform: translateY(100%);
  transition: transform var(--transition), opacity var(--transition);
  pointer-events: none;
}

.content-section.above {
  transform: translateY(-100%);
}

.content-section.active {
  opacity: 1;
  transform: translateY(0);
  pointer-events: auto;
}

.section-inner {
  max-width: var(--content-max-width);
  min-height: 100%;
  margin: 0 auto;
  padding: 3rem 2rem;
  display: flex;
  flex-direction: column;
  justify-content: center;
}

.content-section.tall .section-inner {
  justify-content: flex-start;
}

.section-inner h1 {
  font-size: 2.5rem;
  margin: 0 0 1.5rem;
}

.section-inner h2 {
  font-size: 1.75rem;
  margin: 0 0 1rem;
}

.section-inner a {
  color: var(--primary);
}

/* Code blocks */
.section-inner code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
  background: var(--muted);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.code-block {
  position: relative;
  margin-bottom: 1rem;
}

.code-block pre {
  margin: 0;
  padding: 1rem;
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  overflow-x: auto;
}

.code-block pre code {
  background: none;
  padding: 0;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  background: var(--background);
  color: var(--muted-foreground);
  cursor: pointer;
}

.copy-btn:hover {
  color: var(--foreground);
}

/* Narrow screens: sidebar becomes a top bar */
@media (max-width: 768px) {
  body {
    flex-direction: column;
  }

  .sidebar {
    flex: 0 0 auto;
    height: auto;
    padding: 0.5rem;
    border-right: none;
    border-bottom: 1px solid var(--border);
  }

  .sidebar-title {
    display: none;
  }

  .sidebar-nav {
    flex-direction: row;
    overflow-x: auto;
  }

  .nav-btn {
    width: auto;
    white-space: nowrap;
  }

  main {
    height: auto;
  }
}
"#;

const DEFAULT_JS: &str = r#"// scrolldoc runtime: section navigation and copy buttons
(function() {
  'use strict';

  function addCopyButtons() {
    document.querySelectorAll('pre').forEach(pre => {
      const wrapper = document.createElement('div');
      wrapper.className = 'code-block';
      pre.parentNode.insertBefore(wrapper, pre);
      wrapper.appendChild(pre);

      const btn = document.createElement('button');
      btn.className = 'copy-btn';
      btn.type = 'button';
      btn.textContent = 'Copy';
      btn.addEventListener('click', async () => {
        const code = pre.querySelector('code');
        await navigator.clipboard.writeText((code || pre).textContent);
        btn.textContent = 'Copied!';
        setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
      });
      wrapper.appendChild(btn);
    });
  }

  function number(value, fallback) {
    const parsed = parseFloat(value);
    return isNaN(parsed) ? fallback : parsed;
  }

  function init() {
    addCopyButtons();

    const main = document.querySelector('main[data-settle-ms]');
    if (!main) return;

    const sectionEls = Array.from(main.querySelectorAll('.content-section'));
    const buttons = Array.from(document.querySelectorAll('.sidebar .nav-btn[data-index]'));
    const count = sectionEls.length;
    if (count === 0) return;

    const scrollThreshold = number(main.dataset.scrollThreshold, 50);
    const swipeThreshold = number(main.dataset.swipeThreshold, 50);
    const settleMs = number(main.dataset.settleMs, 600);
    const edgeTolerance = number(main.dataset.edgeTolerance, 1);

    let currentIndex = 0;
    let isTransitioning = false;
    let scrollAccumulator = 0;
    let touchStartY = 0;

    const idOf = i => sectionEls[i].id.replace(/^section-/, '');

    function applyPositions(index) {
      sectionEls.forEach((sec, i) => {
        sec.classList.toggle('active', i === index);
        sec.classList.toggle('above', i < index);
      });
      buttons.forEach((btn, i) => btn.classList.toggle('active', i === index));
    }

    function updateTallSections() {
      const viewportHeight = main.clientHeight;
      sectionEls.forEach(sec => {
        const inner = sec.querySelector('.section-inner') || sec;
        sec.classList.toggle('tall', inner.scrollHeight > viewportHeight);
      });
    }

    function showSection(index) {
      if (index < 0 || index >= count || isTransitioning || index === currentIndex) return;

      isTransitioning = true;
      currentIndex = index;
      applyPositions(index);
      sectionEls[index].scrollTop = 0;
      history.replaceState(null, '', '#' + idOf(index));

      setTimeout(() => { isTransitioning = false; }, settleMs);
    }

    function step(delta) {
      if (delta > 0 && currentIndex < count - 1) {
        showSection(currentIndex + 1);
      } else if (delta < 0 && currentIndex > 0) {
        showSection(currentIndex - 1);
      }
    }

    function hasRoom(delta) {
      const sec = sectionEls[currentIndex];
      if (!sec.classList.contains('tall')) return false;
      const atTop = sec.scrollTop <= 0;
      const atBottom = sec.scrollTop + sec.clientHeight >= sec.scrollHeight - edgeTolerance;
      return (delta > 0 && !atBottom) || (delta < 0 && !atTop);
    }

    buttons.forEach(btn => {
      btn.addEventListener('click', () => showSection(parseInt(btn.dataset.index, 10)));
    });

    document.addEventListener('wheel', e => {
      if (isTransitioning) {
        e.preventDefault();
        return;
      }
      if (hasRoom(e.deltaY)) return;

      e.preventDefault();
      scrollAccumulator += e.deltaY;
      if (Math.abs(scrollAccumulator) >= scrollThreshold) {
        step(scrollAccumulator);
        scrollAccumulator = 0;
      }
    }, { passive: false });

    document.addEventListener('touchstart', e => {
      touchStartY = e.touches[0].clientY;
    }, { passive: true });

    document.addEventListener('touchend', e => {
      if (isTransitioning) return;
      const diff = touchStartY - e.changedTouches[0].clientY;
      if (hasRoom(diff)) return;
      if (Math.abs(diff) > swipeThreshold) step(diff);
    }, { passive: true });

    document.addEventListener('keydown', e => {
      if (isTransitioning) return;
      if (e.key === 'ArrowDown' || e.key === 'PageDown') {
        e.preventDefault();
        step(1);
      } else if (e.key === 'ArrowUp' || e.key === 'PageUp') {
        e.preventDefault();
        step(-1);
      }
    });

    updateTallSections();
    window.addEventListener('resize', updateTallSections);

    if (window.location.hash) {
      const id = window.location.hash.slice(1);
      const index = sectionEls.findIndex((_, i) => idOf(i) === id);
      if (index > 0) {
        currentIndex = index;
        applyPositions(index);
      }
    }
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();
"#;
