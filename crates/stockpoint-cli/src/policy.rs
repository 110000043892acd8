//! Policy rendering for the `show-policy` command.

use stockpoint_rbac::RolePolicy;

/// One line per role: name, permissions, routes.
pub fn render_policy(policy: &RolePolicy) -> String {
    let mut out = String::new();
    for role in policy.roles() {
        let permissions: Vec<String> = policy.permissions_for(role.as_str()).into_iter().collect();
        let routes: Vec<String> = policy.routes_for(role.as_str()).into_iter().collect();
        out.push_str(&format!(
            "{:<22} permissions: [{}]  routes: [{}]\n",
            role.as_str(),
            permissions.join(", "),
            routes.join(", ")
        ));
    }
    out
}
