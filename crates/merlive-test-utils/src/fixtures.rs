//! Canned response payloads

use merlive_core::{project_graph, project_stats, AllocationGraph, AllocationStats};
use serde_json::{json, Value};

pub fn graph_payload(nodes: Value, edges: Value) -> Value {
    json!({
        "EM": "Get allocation data successfully",
        "EC": 0,
        "DT": {"nodes": nodes, "edges": edges}
    })
}

pub fn error_payload(code: i64, message: &str) -> Value {
    json!({"EM": message, "EC": code, "DT": null})
}

/// Two users, two roles, three permissions
pub fn sample_graph_payload() -> Value {
    graph_payload(
        json!([
            {"id": "user-1", "label": "Linh Pham", "type": "user", "data": {"email": "linh@example.com"}},
            {"id": "user-2", "label": "Minh Do", "type": "user", "data": {"email": "minh@example.com"}},
            {"id": "role-1", "label": "Admin", "type": "role", "data": {"description": "Full access"}},
            {"id": "role-2", "label": "Viewer", "type": "role", "data": {"description": "Read only"}},
            {"id": "permission-1", "label": "/user/read", "type": "permission"},
            {"id": "permission-2", "label": "/user/create", "type": "permission"},
            {"id": "permission-3", "label": "/role/update", "type": "permission"}
        ]),
        json!([
            {"id": "user-1-role-1", "source": "user-1", "target": "role-1", "type": "has-role"},
            {"id": "user-2-role-2", "source": "user-2", "target": "role-2", "type": "has-role"},
            {"id": "role-1-permission-1", "source": "role-1", "target": "permission-1", "type": "has-permission"},
            {"id": "role-1-permission-2", "source": "role-1", "target": "permission-2", "type": "has-permission"},
            {"id": "role-1-permission-3", "source": "role-1", "target": "permission-3", "type": "has-permission"},
            {"id": "role-2-permission-1", "source": "role-2", "target": "permission-1", "type": "has-permission"}
        ]),
    )
}

pub fn sample_stats_payload() -> Value {
    json!({
        "EM": "Get allocation statistics successfully",
        "EC": 0,
        "DT": {
            "summary": {"totalUsers": 2, "totalRoles": 2, "totalPermissions": 3},
            "usersByRole": [
                {"roleId": 1, "roleName": "Admin", "count": 1},
                {"roleId": 2, "roleName": "Viewer", "count": 1}
            ],
            "permissionsByRole": [
                {"id": 1, "name": "Admin", "permissionCount": "3"},
                {"id": 2, "name": "Viewer", "permissionCount": "1"}
            ]
        }
    })
}

pub fn sample_graph() -> AllocationGraph {
    project_graph(&sample_graph_payload()).expect("sample graph payload is well formed")
}

pub fn sample_stats() -> AllocationStats {
    project_stats(&sample_stats_payload()).expect("sample stats payload is well formed")
}
