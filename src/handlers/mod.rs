// handlers/mod.rs - Two-tier handler layout
//
// Public (no session needed) → Protected (session attached by the guard)
//
pub mod public;    // Tier 1: landing, health, /auth/* credential flows
pub mod protected; // Tier 2: /dashboard/* screens

/*
ROUTE TIERS:

Both tiers sit behind the session guard; the tier only says what a handler
may assume about the request.

- public:    no session required. The guard still bounces signed-in users
             away from `/` and `/auth/...` to the dashboard.
- protected: a signed-in session is guaranteed by the guard and is taken
             with the `CurrentSession` extractor. Handlers never look up the
             session themselves.
*/
