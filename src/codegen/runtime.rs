//! # Runtime Helpers
//!
//! Three small hand-written routines appended to every generated program,
//! unconditionally: `display_number` (prints the accumulator as decimal
//! plus a trailing newline), `display_number_nonl` (same, no newline), and
//! `print_char` (writes the low byte of `al`). All three talk to the
//! kernel directly via `write(2)` rather than linking libc, matching the
//! rest of the generated program's `-nostartfiles` footing.
//!
//! Kept as one literal assembly blob rather than built line-by-line —
//! there's no per-program variation here, so there's nothing for a
//! `GeneratorState` lowering pass to parametrize.

pub fn emit(lines: &mut Vec<String>) {
    for line in TEXT.lines() {
        lines.push(line.to_string());
    }
}

const TEXT: &str = "\
display_number:
    push rax
    push rbx
    push rcx
    push rdx

    mov rbx, rax
    cmp rbx, 0
    jne .num_nonzero

    mov word [buffer], '0'+0x0A
    mov rax, 1
    mov rdi, 1
    lea rsi, [buffer]
    mov rdx, 2
    syscall
    jmp .end_display

.num_nonzero:
    lea rcx, [buffer+19]
    mov byte [rcx], 10
    dec rcx
    mov rax, rbx

.convert_loop:
    xor rdx, rdx
    mov rsi, 10
    div rsi
    add dl, '0'
    mov [rcx], dl
    dec rcx
    cmp rax, 0
    jne .convert_loop

    inc rcx
    mov rax, 1
    mov rdi, 1
    lea rsi, [rcx]
    mov rdx, buffer+20
    sub rdx, rcx
    syscall

.end_display:
    pop rdx
    pop rcx
    pop rbx
    pop rax
    ret

display_number_nonl:
    push rax
    push rbx
    push rcx
    push rdx

    mov rbx, rax
    cmp rbx, 0
    jne .num_nonzero_nl

    mov byte [buffer], '0'
    mov rax, 1
    mov rdi, 1
    lea rsi, [buffer]
    mov rdx, 1
    syscall
    jmp .end_display_nl

.num_nonzero_nl:
    lea rcx, [buffer+19]
    mov byte [rcx], 0
    dec rcx
    mov rax, rbx

.convert_loop_nl:
    xor rdx, rdx
    mov rsi, 10
    div rsi
    add dl, '0'
    mov [rcx], dl
    dec rcx
    cmp rax, 0
    jne .convert_loop_nl

    inc rcx
    mov rax, 1
    mov rdi, 1
    lea rsi, [rcx]
    mov rdx, buffer+20
    sub rdx, rcx
    syscall

.end_display_nl:
    pop rdx
    pop rcx
    pop rbx
    pop rax
    ret

print_char:
    mov [buffer], al
    mov rax, 1
    mov rdi, 1
    lea rsi, [buffer]
    mov rdx, 1
    syscall
    ret";
