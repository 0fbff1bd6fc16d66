#![allow(dead_code)]

/// Lookup statements over `users`: dynamic filters, IN lists, a LIKE pattern
/// built with `bind`, and an ordering picked with `choose`.
pub const USERS_MAPPER: &str = r##"{
    "namespace": "users",
    "fragments": {
        "columns": ["${alias}.id, ${alias}.name, ${alias}.email"]
    },
    "statements": [
        { "id": "findById", "parameterType": "long",
          "body": ["select ",
                   {"tag": "include", "attrs": {"refid": "columns"},
                    "children": [{"tag": "property", "attrs": {"name": "alias", "value": "u"}}]},
                   " from users u where u.id = #{id}"] },

        { "id": "search",
          "body": ["select * from users ",
                   {"tag": "where", "children": [
                       {"tag": "if", "attrs": {"test": "name != null and name != ''"},
                        "children": ["AND name = #{name} "]},
                       {"tag": "if", "attrs": {"test": "email != null"},
                        "children": ["AND email = #{email,jdbcType=VARCHAR} "]},
                       {"tag": "if", "attrs": {"test": "ids != null and ids.size() > 0"},
                        "children": ["AND id IN ",
                            {"tag": "foreach", "attrs": {"collection": "ids", "item": "id",
                             "open": "(", "close": ")", "separator": ","},
                             "children": ["#{id}"]}]}
                   ]}] },

        { "id": "findLike",
          "body": [{"tag": "bind", "attrs": {"name": "pattern", "value": "'%' + name + '%'"}},
                   "select * from users where name like #{pattern}"] },

        { "id": "ordered",
          "body": ["select * from users order by ",
                   {"tag": "choose", "children": [
                       {"tag": "when", "attrs": {"test": "sort == 'name'"}, "children": ["name"]},
                       {"tag": "when", "attrs": {"test": "sort == 'email'"}, "children": ["email"]},
                       {"tag": "otherwise", "children": ["id"]}
                   ]}] },

        { "id": "update", "kind": "update",
          "body": ["update users ",
                   {"tag": "set", "children": [
                       {"tag": "if", "attrs": {"test": "name != null"}, "children": ["name = #{name}, "]},
                       {"tag": "if", "attrs": {"test": "email != null"}, "children": ["email = #{email}, "]}
                   ]},
                   " where id = #{id}"] },

        { "id": "insertAll", "kind": "insert",
          "body": ["insert into users (name, email) values ",
                   {"tag": "foreach", "attrs": {"collection": "list", "item": "u", "separator": ", "},
                    "children": ["(#{u.name}, #{u.email})"]}] },

        { "id": "now",
          "body": ["select ",
                   {"tag": "if", "attrs": {"test": "_databaseId == 'postgres'"}, "children": ["now()"]},
                   {"tag": "if", "attrs": {"test": "_databaseId != 'postgres'"}, "children": ["sysdate()"]}] }
    ]
}"##;

/// Stored procedure call with an output parameter.
pub const ACCOUNTS_MAPPER: &str = r##"{
    "namespace": "accounts",
    "statements": [
        { "id": "balance",
          "body": ["{call account_balance(#{id,mode=IN}, #{total,mode=OUT,jdbcType=NUMERIC,numericScale=2})}"] },
        { "id": "page",
          "body": ["select * from accounts where owner = #{owner}"] }
    ]
}"##;

/// Statements that only fail once an argument is supplied.
pub const BROKEN_MAPPER: &str = r##"{
    "namespace": "broken",
    "statements": [
        { "id": "badTest",
          "body": ["select 1 ", {"tag": "if", "attrs": {"test": "name.length() > 2"}, "children": ["where 1 = 1"]}] },
        { "id": "notIterable",
          "body": ["select 1 where id in ",
                   {"tag": "foreach", "attrs": {"collection": "ids", "item": "id"}, "children": ["#{id}"]}] }
    ]
}"##;
