//! The C++ extraction query.
//!
//! One pattern per documentable declaration shape. Capture labels are the
//! contract with the query driver: `docs` is the optional adjacent comment,
//! `name` the identifier, `body`/`value` bound the declaration signature,
//! and the remaining label names the entity kind and spans the whole
//! declaration.

pub const QUERY: &str = r#"
;; namespaces
((comment)? @docs .
  (namespace_definition
    name: (namespace_identifier) @name
    body: (declaration_list) @body) @namespace)

;; classes, structs, unions, enums
((comment)? @docs .
  (class_specifier
    name: (type_identifier) @name
    body: (field_declaration_list) @body) @type)

((comment)? @docs .
  (struct_specifier
    name: (type_identifier) @name
    body: (field_declaration_list) @body) @type)

((comment)? @docs .
  (union_specifier
    name: (type_identifier) @name
    body: (field_declaration_list) @body) @type)

((comment)? @docs .
  (enum_specifier
    name: (type_identifier) @name
    body: (enumerator_list) @body) @type)

;; enumerators
((comment)? @docs .
  (enumerator
    name: (identifier) @name
    value: (_)? @value) @enumerator)

;; variables
((comment)? @docs .
  (declaration
    declarator: (init_declarator
      declarator: (identifier) @name
      value: (_) @value)) @variable)

((comment)? @docs .
  (declaration
    declarator: (identifier) @name) @variable)

((comment)? @docs .
  (field_declaration
    declarator: (field_identifier) @name
    default_value: (_)? @value) @variable)

;; function definitions
((comment)? @docs .
  (function_definition
    declarator: (function_declarator
      declarator: [(identifier) (field_identifier) (qualified_identifier) (destructor_name)] @name)
    body: (compound_statement) @body) @function)

;; function declarations
((comment)? @docs .
  (declaration
    declarator: (function_declarator
      declarator: [(identifier) (qualified_identifier) (destructor_name)] @name)) @function)

((comment)? @docs .
  (field_declaration
    declarator: (function_declarator
      declarator: [(identifier) (field_identifier) (destructor_name)] @name)) @function)

;; operators
((comment)? @docs .
  (function_definition
    declarator: (function_declarator
      declarator: (operator_name) @name)
    body: (compound_statement) @body) @operator)

((comment)? @docs .
  (declaration
    declarator: (function_declarator
      declarator: (operator_name) @name)) @operator)

((comment)? @docs .
  (field_declaration
    declarator: (function_declarator
      declarator: (operator_name) @name)) @operator)

;; macros
((comment)? @docs .
  (preproc_def
    name: (identifier) @name
    value: (preproc_arg)? @value) @macro)

((comment)? @docs .
  (preproc_function_def
    name: (identifier) @name
    value: (preproc_arg)? @value) @macro)
"#;
